//! List controllers: fetch a collection, project it into table rows, and host
//! the create/edit overlay.

pub mod consultorios;
pub mod usuarios;

pub use consultorios::{ConsultorioList, ConsultorioRow};
pub use usuarios::{UsuarioList, UsuarioRow};
