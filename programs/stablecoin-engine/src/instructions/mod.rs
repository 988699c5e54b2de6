pub mod initialize;
pub mod deposit;
pub mod mint;
pub mod redeem;
pub mod burn;
pub mod composite;
pub mod liquidate;
pub mod view;

pub use initialize::*;
pub use deposit::*;
pub use mint::*;
pub use redeem::*;
pub use burn::*;
pub use composite::*;
pub use liquidate::*;
pub use view::*;
