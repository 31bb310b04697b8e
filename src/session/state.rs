use crate::core::EntityId;
use crate::model::{Project, Role, User};
use crate::sync::SyncOperation;

/// Landing dashboard for a role. Managers share the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Admin,
    Member,
}

/// Identity of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
    role: Option<Role>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        let role = user.role;
        Self {
            token: Some(token.into()),
            user: Some(user),
            role: Some(role),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&EntityId> {
        self.user.as_ref().map(|user| &user.id)
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Route guard. An empty list admits any signed-in user.
    pub fn permits(&self, roles: &[Role]) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        match self.role {
            Some(role) => roles.is_empty() || roles.contains(&role),
            None => roles.is_empty(),
        }
    }

    /// Editing reports and managing users.
    pub fn can_manage(&self) -> bool {
        self.permits(&[Role::Admin, Role::Manager])
    }

    pub fn dashboard(&self) -> Option<DashboardView> {
        if !self.is_authenticated() {
            return None;
        }
        match self.role? {
            Role::Admin | Role::Manager => Some(DashboardView::Admin),
            Role::Member => Some(DashboardView::Member),
        }
    }

    /// Project listing for the signed-in user: every project for admins,
    /// owned projects for everyone else.
    pub fn project_listing(&self) -> Option<SyncOperation<Project>> {
        let user = self.user.as_ref()?;
        match self.role? {
            Role::Admin => Some(SyncOperation::FetchAll),
            Role::Manager | Role::Member => Some(SyncOperation::FetchByParent(user.id.clone())),
        }
    }

    pub(crate) fn replace_user(&mut self, user: User) {
        self.role = Some(user.role);
        self.user = Some(user);
    }
}
