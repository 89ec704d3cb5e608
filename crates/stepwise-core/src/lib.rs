pub mod prereq;
pub mod progress;
pub mod registry;
pub mod tutorial;

pub use prereq::{
    collect_all_incomplete_prerequisites, find_nearest_incomplete_prerequisite,
    is_tutorial_chain_complete, should_show_prerequisites, IncompletePrerequisites,
};
pub use progress::{Progress, ProgressData, ProgressStats, TutorialProgress};
pub use registry::{Registry, RegistryEntry, RegistryIssue};
pub use tutorial::{build_tutorial_map, TutorialInfo, TutorialMap};
