pub mod state_machine;
mod tier;

pub use state_machine::{
    apply_automated_classification, apply_manual_registration, apply_manual_verification, Transition,
};
pub use tier::TrustTier;
