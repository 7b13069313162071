//! Client session state: the current token and the identity it was issued for.
//!
//! [`SessionStore`] is an explicit value handed to whatever needs it. It starts
//! empty, `login` replaces token and user together, `logout` clears both.
//! Every change goes through a [`SessionStorage`] first so the session
//! survives restarts.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use shared::{Identity, Role};
use tracing::{debug, warn};

use crate::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Identity>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user.as_ref().is_some_and(|user| user.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

pub trait SessionStorage {
    fn load(&self) -> Result<Option<Session>, ClientError>;
    fn save(&mut self, session: &Session) -> Result<(), ClientError>;
}

/// Keeps the session for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: Option<Session>,
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, session: &Session) -> Result<(), ClientError> {
        self.saved = Some(session.clone());
        Ok(())
    }
}

/// On-disk layout: `{"state": {"token", "user"}, "version": 0}`.
#[derive(Debug, Serialize, Deserialize)]
struct Persisted {
    state: Session,
    version: u32,
}

/// JSON file storage. Writes go to a sibling temp file which is then renamed
/// over the target, so a crash never leaves half a session behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub const FILE_NAME: &'static str = "auth-storage.json";
    const VERSION: u32 = 0;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `auth-storage.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Persisted>(&raw) {
            Ok(persisted) if persisted.version == Self::VERSION => Ok(Some(persisted.state)),
            Ok(persisted) => {
                warn!(
                    "Ignoring session file {} with version {}",
                    self.path.display(),
                    persisted.version
                );
                Ok(None)
            }
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&mut self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let persisted = Persisted {
            state: session.clone(),
            version: Self::VERSION,
        };
        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, &serde_json::to_vec_pretty(&persisted)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Creates `path` afresh, readable by the owner only on unix.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    session: Session,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Restores whatever the storage holds, or starts empty.
    pub fn open(storage: S) -> Result<Self, ClientError> {
        let session = storage.load()?.unwrap_or_default();
        debug!("Session restored, logged in: {}", session.is_logged_in());
        Ok(Self { storage, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn user(&self) -> Option<&Identity> {
        self.session.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.session.has_role(role)
    }

    pub fn login(&mut self, token: String, user: Identity) -> Result<(), ClientError> {
        self.replace(Session {
            token: Some(token),
            user: Some(user),
        })
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.replace(Session::default())
    }

    /// Applies an admin's role change when it targets the logged-in account.
    /// Returns whether the cached identity changed.
    pub fn update_user_role(&mut self, user_id: i64, role: Role) -> Result<bool, ClientError> {
        let mut next = self.session.clone();
        match next.user.as_mut() {
            Some(user) if user.id == user_id => user.role = role,
            _ => return Ok(false),
        }
        self.replace(next)?;
        Ok(true)
    }

    /// Persist first; the in-memory state only moves once the write succeeded.
    fn replace(&mut self, next: Session) -> Result<(), ClientError> {
        self.storage.save(&next)?;
        self.session = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice(role: Role) -> Identity {
        Identity::new(1, "alice@example.com", role)
    }

    #[test]
    fn starts_empty() {
        let store = SessionStore::open(MemoryStorage::default()).unwrap();
        assert!(!store.is_logged_in());
        assert!(!store.is_admin());
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn login_and_logout_move_token_and_user_together() {
        let mut store = SessionStore::open(MemoryStorage::default()).unwrap();
        store.login("tok".into(), alice(Role::Admin)).unwrap();
        assert!(store.is_logged_in());
        assert!(store.is_admin());
        assert!(store.has_role(Role::Admin));
        assert!(!store.has_role(Role::User));

        store.logout().unwrap();
        assert_eq!(store.session(), &Session::default());
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = SessionStore::open(FileStorage::in_dir(dir.path())).unwrap();
            store.login("persisted".into(), alice(Role::User)).unwrap();
        }
        let mut store = SessionStore::open(FileStorage::in_dir(dir.path())).unwrap();
        assert_eq!(store.token(), Some("persisted"));
        assert_eq!(store.user(), Some(&alice(Role::User)));

        store.logout().unwrap();
        let store = SessionStore::open(FileStorage::in_dir(dir.path())).unwrap();
        assert!(!store.is_logged_in());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("auth-storage.json.tmp");
        fs::write(&tmp, "stale").unwrap();
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = SessionStore::open(FileStorage::in_dir(dir.path())).unwrap();
        store.login("secret-token".into(), alice(Role::User)).unwrap();

        let path = dir.path().join(FileStorage::FILE_NAME);
        let mode = fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        fs::write(storage.path(), "{ nope").unwrap();
        let store = SessionStore::open(storage).unwrap();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn failed_write_leaves_state_untouched() {
        struct Broken;
        impl SessionStorage for Broken {
            fn load(&self) -> Result<Option<Session>, ClientError> {
                Ok(None)
            }
            fn save(&mut self, _: &Session) -> Result<(), ClientError> {
                Err(std::io::Error::other("read-only").into())
            }
        }

        let mut store = SessionStore::open(Broken).unwrap();
        assert!(store.login("tok".into(), alice(Role::User)).is_err());
        assert!(!store.is_logged_in());
        assert_eq!(store.user(), None);
    }

    #[test]
    fn role_update_only_touches_the_current_user() {
        let mut store = SessionStore::open(MemoryStorage::default()).unwrap();
        assert!(!store.update_user_role(1, Role::Admin).unwrap());

        store.login("tok".into(), alice(Role::User)).unwrap();
        assert!(!store.update_user_role(2, Role::Admin).unwrap());
        assert!(!store.is_admin());

        assert!(store.update_user_role(1, Role::Admin).unwrap());
        assert!(store.is_admin());
        assert_eq!(store.token(), Some("tok"));
    }
}
