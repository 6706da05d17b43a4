//! Pure list projection and home-screen view state.
//!
//! Nothing here touches storage; callers re-query the repository after a
//! mutation and feed the result through `project`.

pub mod home_state;
pub mod projection;
