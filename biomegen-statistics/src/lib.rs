mod descriptive;
// re-export symbols to the top-most level of the module's name space
pub use descriptive::*;
