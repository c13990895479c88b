//! the type model shared by the catalog, the layout compiler and the
//! resource resolver.

mod align_size;
mod canon_name;
mod format;
mod resource;
mod struct_;
mod tensor;
mod ty;

pub use align_size::*;
pub use canon_name::*;
pub use format::*;
pub use resource::*;
pub use struct_::*;
pub use tensor::*;
pub use ty::*;
