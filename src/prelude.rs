// inclusion facility

pub use crate::costs::*;

pub use crate::ranked::*;

pub use crate::effectiveness::*;

pub use crate::assignment::*;

pub use crate::greedy::*;

pub use crate::instance::*;

pub use crate::error::FlpError;
