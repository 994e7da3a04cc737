pub mod error;
pub mod guard;
pub mod runtime;

use syn::{ReturnType, Type};

/// Whether the signature returns a type whose last path segment is `Result`.
fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}
