mod args;

pub use args::{AuthArgs, AuthArgsBuilder};
