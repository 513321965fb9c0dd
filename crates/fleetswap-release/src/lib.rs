//! fleetswap-release — resolution, validation, and halt engine for
//! blue/green fleet releases.
//!
//! An external release driver feeds a [`descriptor::ReleaseSpec`] through
//! [`resolve::resolve`] and [`resources::validate`] before advancing its
//! state machine; on abort it calls [`halt::halt`], and after a swap it
//! tears down the superseded scaling group via
//! [`fleetswap_cloud::scaling_group::ScalingGroup::teardown`].
//!
//! Nothing here retries: every operation fails fast with the first error,
//! and re-attempting a pass (or a destructive action) is the driver's call.

pub mod descriptor;
pub mod error;
pub mod halt;
pub mod resolve;
pub mod resources;

pub use descriptor::ReleaseSpec;
pub use error::{ReleaseError, ReleaseResult};
pub use resources::ServiceResources;
