pub use self::linear_elasticity::*;

mod linear_elasticity;
