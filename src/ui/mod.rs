pub mod style;

pub use style::Role;
