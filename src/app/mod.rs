// Application layer - Use case interactors

pub mod compose_interactor;
pub mod container;
pub mod inspect_interactor;

// Re-export interactors
pub use compose_interactor::{
    ComposeInteractor, ComposeOutcome, ComposeSettings, PlannedRender,
};
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::{InspectInteractor, InspectReport};
