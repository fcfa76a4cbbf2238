pub mod reference;
pub mod type_expr;
pub mod type_model;

pub use reference::ComponentRef;
pub use type_expr::{RecordField, TsKeyword, TypeExpr};
pub use type_model::{EnumLiteral, EnumMember, ModelKind, TypeIdentifier, TypeModel};
