use super::{Session, base_name};

/// Name of the active repository for prompt integrations: the repository
/// around the working directory, else the saved one.
///
/// Never fails. Anything unexpected reads as "no context" so a prompt never
/// shows an error.
#[must_use]
pub fn current_context(session: &Session) -> Option<String> {
    session
        .resolve_repo_root()
        .ok()
        .map(|root| base_name(&root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{mock_picker, session};
    use crate::runner::FakeRunner;
    use crate::selection::Selection;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use tempfile::TempDir;

    #[test]
    fn test_context_inside_repo() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let fake = Rc::new(FakeRunner::new());
        let (session, _) = session(&fake, temp.path(), mock_picker(Selection::Cancelled), "");

        assert_eq!(current_context(&session), Some("myrepo".to_string()));
        assert!(session.registry.list()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_context_outside_repo() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let fake = Rc::new(FakeRunner::new());
        let (mut session, _) = session(&fake, temp.path(), mock_picker(Selection::Cancelled), "");
        session.cwd = PathBuf::from("/tmp");

        assert_eq!(current_context(&session), None);

        session.registry.set_current(Path::new("/home/u/foo"))?;
        assert_eq!(current_context(&session), Some("foo".to_string()));
        Ok(())
    }
}
