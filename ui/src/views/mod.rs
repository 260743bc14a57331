mod home;
pub use home::Home;

mod workspace;
pub use workspace::{use_workspace_provider, Workspace, WorkspaceState};
