use std::sync::Arc;
use tracing::{debug, warn};
use zainflix_models::{SelectedProfile, Session};

use crate::storage::{keys, KeyValueStore};

/// Session state: current login, selected profile, remember flag. All
/// operations that persist return plain booleans; the underlying error is
/// logged rather than propagated, matching how callers consume them
/// (degrade to a user-visible notice, never crash).
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// True iff a session record exists, parseable or not.
    pub fn is_logged_in(&self) -> bool {
        matches!(self.store.get(keys::USER_SESSION), Ok(Some(_)))
    }

    /// Current session, or None. Malformed stored data is treated as absent.
    pub fn current_user(&self) -> Option<Session> {
        let raw = match self.store.get(keys::USER_SESSION) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read user session: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Stored user session is malformed, treating as absent: {}", e);
                None
            }
        }
    }

    pub fn current_profile(&self) -> Option<SelectedProfile> {
        let raw = match self.store.get(keys::SELECTED_PROFILE) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read selected profile: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Stored profile selection is malformed, treating as absent: {}", e);
                None
            }
        }
    }

    pub fn has_selected_profile(&self) -> bool {
        self.current_profile().is_some()
    }

    pub fn login(&self, session: &Session, remember: bool) -> bool {
        let raw = match serde_json::to_string(session) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode session: {}", e);
                return false;
            }
        };
        if let Err(e) = self.store.set(keys::USER_SESSION, &raw) {
            warn!("Failed to persist session: {}", e);
            return false;
        }
        if remember {
            if let Err(e) = self.store.set(keys::REMEMBER_USER, "\"true\"") {
                warn!("Failed to persist remember flag: {}", e);
            }
        }
        debug!("User logged in: {}", session.email);
        true
    }

    /// Removes session, selected profile, and remember flag. Watch lists are
    /// deliberately left in place; they are keyed by email and survive
    /// login cycles.
    pub fn logout(&self) -> bool {
        for key in [keys::USER_SESSION, keys::SELECTED_PROFILE, keys::REMEMBER_USER] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to remove {} on logout: {}", key, e);
                return false;
            }
        }
        debug!("User logged out");
        true
    }

    pub fn select_profile(&self, name: &str, theme: &str) -> bool {
        let profile = SelectedProfile::new(name, theme);
        let raw = match serde_json::to_string(&profile) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode profile selection: {}", e);
                return false;
            }
        };
        if let Err(e) = self.store.set(keys::SELECTED_PROFILE, &raw) {
            warn!("Failed to persist profile selection: {}", e);
            return false;
        }
        debug!("Profile selected: {}", name);
        true
    }

    pub fn remember_user(&self) -> bool {
        matches!(self.store.get(keys::REMEMBER_USER), Ok(Some(_)))
    }

    /// Route-guard check for the current session state.
    pub fn protect_route(&self, page: Page) -> RouteAction {
        protect_route(self.is_logged_in(), self.has_selected_profile(), page)
    }

    /// Where a fresh entry should land given the current state.
    pub fn redirect_page(&self) -> Page {
        if !self.is_logged_in() {
            Page::Landing
        } else if !self.has_selected_profile() {
            Page::ProfileSelect
        } else {
            Page::Home
        }
    }
}

/// The pages of the web app, the navigation vocabulary of the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    Login,
    Register,
    ProfileSelect,
    Home,
    MyList,
}

impl Page {
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "" | "index.html" => Some(Page::Landing),
            "login.html" => Some(Page::Login),
            "register.html" => Some(Page::Register),
            "profile.html" => Some(Page::ProfileSelect),
            "home.html" => Some(Page::Home),
            "mylist.html" => Some(Page::MyList),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Page::Landing => "index.html",
            Page::Login => "login.html",
            Page::Register => "register.html",
            Page::ProfileSelect => "profile.html",
            Page::Home => "home.html",
            Page::MyList => "mylist.html",
        }
    }

    /// Landing and the auth forms: pages a logged-in user gets bounced off.
    fn is_auth_entry(&self) -> bool {
        matches!(self, Page::Landing | Page::Login | Page::Register)
    }

    /// Pages that require both a login and a selected profile.
    fn is_protected(&self) -> bool {
        matches!(self, Page::Home | Page::MyList)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    Allow,
    Redirect(Page),
}

/// Pure route-guard decision. The auth-entry case is checked before the
/// general protected-page case: logged in without a profile on a content
/// page must land on profile selection, not bounce back to home.
pub fn protect_route(logged_in: bool, has_profile: bool, page: Page) -> RouteAction {
    if logged_in {
        if page.is_auth_entry() {
            return RouteAction::Redirect(if has_profile {
                Page::Home
            } else {
                Page::ProfileSelect
            });
        }
        if page.is_protected() && !has_profile {
            return RouteAction::Redirect(Page::ProfileSelect);
        }
        // Profile selection stays reachable so the user can switch
        RouteAction::Allow
    } else if page.is_protected() {
        RouteAction::Redirect(Page::Landing)
    } else {
        RouteAction::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session_store() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_login_logout_cycle() {
        let store = session_store();
        assert!(!store.is_logged_in());
        assert_eq!(store.current_user(), None);

        assert!(store.login(&Session::new("a@x.com"), true));
        assert!(store.is_logged_in());
        assert!(store.remember_user());
        assert_eq!(store.current_user().unwrap().email, "a@x.com");

        assert!(store.select_profile("Katana", "#f000ff"));
        assert!(store.has_selected_profile());

        assert!(store.logout());
        assert!(!store.is_logged_in());
        assert!(!store.has_selected_profile());
        assert!(!store.remember_user());
    }

    #[test]
    fn test_malformed_session_treated_as_absent() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(keys::USER_SESSION, "not json{").unwrap();
        let store = SessionStore::new(kv);

        // Record exists, so the user counts as logged in, but the parsed
        // session fails soft
        assert!(store.is_logged_in());
        assert_eq!(store.current_user(), None);
    }

    #[test]
    fn test_guard_logged_in_with_profile_on_landing_redirects_home() {
        assert_eq!(
            protect_route(true, true, Page::Landing),
            RouteAction::Redirect(Page::Home)
        );
        assert_eq!(
            protect_route(true, true, Page::Login),
            RouteAction::Redirect(Page::Home)
        );
    }

    #[test]
    fn test_guard_logged_in_without_profile_redirects_to_profile_select() {
        // Logged in without a profile, home.html lands on profile.html
        let page = Page::from_file_name("home.html").unwrap();
        let action = protect_route(true, false, page);
        assert_eq!(action, RouteAction::Redirect(Page::ProfileSelect));
        match action {
            RouteAction::Redirect(target) => assert_eq!(target.file_name(), "profile.html"),
            RouteAction::Allow => panic!("expected redirect"),
        }

        assert_eq!(
            protect_route(true, false, Page::Landing),
            RouteAction::Redirect(Page::ProfileSelect)
        );
    }

    #[test]
    fn test_guard_logged_out_on_protected_page_redirects_to_landing() {
        // Not logged in, mylist.html lands on index.html
        let page = Page::from_file_name("mylist.html").unwrap();
        match protect_route(false, false, page) {
            RouteAction::Redirect(target) => assert_eq!(target.file_name(), "index.html"),
            RouteAction::Allow => panic!("expected redirect"),
        }
    }

    #[test]
    fn test_guard_profile_select_always_allowed_when_logged_in() {
        assert_eq!(
            protect_route(true, true, Page::ProfileSelect),
            RouteAction::Allow
        );
        assert_eq!(
            protect_route(true, false, Page::ProfileSelect),
            RouteAction::Allow
        );
    }

    #[test]
    fn test_guard_logged_out_public_pages_allowed() {
        assert_eq!(protect_route(false, false, Page::Landing), RouteAction::Allow);
        assert_eq!(protect_route(false, false, Page::Login), RouteAction::Allow);
        assert_eq!(
            protect_route(false, false, Page::ProfileSelect),
            RouteAction::Allow
        );
    }
}
