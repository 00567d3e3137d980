//! Records managed by the club admin, one module per resource.
//!
//! Wire names follow the backend's camelCase JSON; ids arrive as `_id`
//! except for blog posts, which are keyed by slug.

mod about;
mod blog;
mod contact;
mod fixture;
mod gallery;
mod honor;
mod mail;
mod member;
mod player;

pub use about::*;
pub use blog::*;
pub use contact::*;
pub use fixture::*;
pub use gallery::*;
pub use honor::*;
pub use mail::*;
pub use member::*;
pub use player::*;
