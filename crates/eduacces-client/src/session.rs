//! The authenticated session, persisted to a small JSON file.
//!
//! [`SessionStore`] is the single source of truth for the current user and
//! token. The client reads the token from it on every request via
//! [`TokenSource`].

use std::{
  fs::{self, OpenOptions},
  io::{self, Write},
  path::{Path, PathBuf},
  sync::{PoisonError, RwLock},
};

use eduacces_core::account::{Session, SessionUser};

use crate::{
  error::{Error, Result},
  token::TokenSource,
};

pub struct SessionStore {
  path:    Option<PathBuf>,
  current: RwLock<Option<Session>>,
}

impl SessionStore {
  /// A store that never touches the filesystem.
  pub fn in_memory() -> Self { Self { path: None, current: RwLock::new(None) } }

  /// Open the store backed by `path`, loading any session saved there.
  ///
  /// A missing file means "logged out". A file that no longer parses is
  /// treated the same way, with a warning, rather than locking the operator
  /// out of the dashboard.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
    let path = path.into();
    let current = match fs::read_to_string(&path) {
      Ok(raw) => match serde_json::from_str::<Session>(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
          tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
          None
        }
      },
      Err(e) if e.kind() == io::ErrorKind::NotFound => None,
      Err(source) => return Err(Error::SessionIo { path, source }),
    };
    Ok(Self { path: Some(path), current: RwLock::new(current) })
  }

  /// `$XDG_STATE_HOME/eduacces/session.json`, falling back to
  /// `~/.local/state/eduacces/session.json`.
  pub fn default_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("session.json"))
  }

  pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

  pub fn current(&self) -> Option<Session> {
    self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn user(&self) -> Option<SessionUser> { self.current().map(|s| s.user) }

  pub fn is_authenticated(&self) -> bool {
    self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
  }

  /// Persist `session` and make it current.
  pub fn save(&self, session: Session) -> Result<()> {
    if let Some(path) = &self.path {
      let raw = serde_json::to_string_pretty(&session)
        .map_err(|source| Error::SessionFormat { path: path.clone(), source })?;
      if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
          .map_err(|source| Error::SessionIo { path: path.clone(), source })?;
      }
      write_private(path, raw.as_bytes())
        .map_err(|source| Error::SessionIo { path: path.clone(), source })?;
    }
    *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    Ok(())
  }

  /// Forget the session in memory and on disk.
  pub fn clear(&self) -> Result<()> {
    *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    if let Some(path) = &self.path {
      match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(Error::SessionIo { path: path.clone(), source }),
      }
    }
    Ok(())
  }
}

impl TokenSource for SessionStore {
  fn token(&self) -> Option<String> {
    self
      .current
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .as_ref()
      .map(|s| s.token.clone())
  }
}

/// Per-user state directory for eduacces files.
pub fn state_dir() -> Option<PathBuf> {
  if let Some(dir) = std::env::var_os("XDG_STATE_HOME").filter(|d| !d.is_empty()) {
    return Some(PathBuf::from(dir).join("eduacces"));
  }
  std::env::var_os("HOME")
    .filter(|h| !h.is_empty())
    .map(|home| PathBuf::from(home).join(".local/state/eduacces"))
}

/// Write `contents` to `path` with owner-only permissions on unix.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
  let mut options = OpenOptions::new();
  options.write(true).create(true).truncate(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    options.mode(0o600);
    let mut file = options.open(path)?;
    // `mode` only applies on creation; tighten a file left by an older run.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
  }
  #[cfg(not(unix))]
  {
    options.open(path)?.write_all(contents)
  }
}

#[cfg(test)]
mod tests {
  use eduacces_core::{PersonId, UserId, person::Role};

  use super::*;

  fn session(token: &str) -> Session {
    Session {
      user:  SessionUser {
        id:         UserId(1),
        email:      "dir@sena.edu.co".into(),
        person_id:  PersonId(9),
        role:       Role::Director,
        first_name: Some("Marta".into()),
        last_name:  None,
      },
      token: token.into(),
    }
  }

  #[test]
  fn save_then_reopen_restores_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/session.json");

    let store = SessionStore::open(&path).unwrap();
    assert!(!store.is_authenticated());
    store.save(session("tok-1")).unwrap();
    assert_eq!(store.token().as_deref(), Some("tok-1"));
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      let mode = fs::metadata(&path).unwrap().permissions().mode();
      assert_eq!(mode & 0o777, 0o600);
    }

    let reopened = SessionStore::open(&path).unwrap();
    assert_eq!(reopened.current(), Some(session("tok-1")));
    assert_eq!(reopened.user().unwrap().email, "dir@sena.edu.co");
  }

  #[cfg(unix)]
  #[test]
  fn save_tightens_an_existing_readable_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{}").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    SessionStore::open(&path).unwrap().save(session("tok-3")).unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
  }

  #[test]
  fn clear_removes_file_and_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = SessionStore::open(&path).unwrap();
    store.save(session("tok-2")).unwrap();

    store.clear().unwrap();
    assert!(store.token().is_none());
    assert!(!path.exists());
    // Clearing twice is fine.
    store.clear().unwrap();
  }

  #[test]
  fn corrupt_file_opens_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{ not json").unwrap();
    let store = SessionStore::open(&path).unwrap();
    assert!(store.current().is_none());
  }

  #[test]
  fn in_memory_store_keeps_token() {
    let store = SessionStore::in_memory();
    store.save(session("mem")).unwrap();
    assert_eq!(store.token().as_deref(), Some("mem"));
    assert!(store.path().is_none());
  }
}
