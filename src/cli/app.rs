use anyhow::{Context, Result, anyhow};
use impactdesk::api::{ApiConfig, AuthApi, Credentials, HttpApi, MemoryApi, ResourceApi};
use impactdesk::model::{
    Activity, Entity, EntityPatch, Metric, NewActivity, NewProject, Project, Report, User,
};
use impactdesk::preview::{DocumentPreview, HttpDocumentSource, PreviewState, load_preview};
use impactdesk::session::{FileSessionStorage, SessionManager, SessionStorage};
use impactdesk::store::{StoreHandle, Stored};
use impactdesk::sync::{SyncClient, SyncOperation};
use impactdesk::EntityId;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{Cli, Command, EntityAction};

/// Everything the command line talks to: the five resource kinds plus login.
pub trait Backend:
    ResourceApi<Project>
    + ResourceApi<Activity>
    + ResourceApi<Metric>
    + ResourceApi<Report>
    + ResourceApi<User>
    + AuthApi
    + 'static
{
}

impl<A> Backend for A where
    A: ResourceApi<Project>
        + ResourceApi<Activity>
        + ResourceApi<Metric>
        + ResourceApi<Report>
        + ResourceApi<User>
        + AuthApi
        + 'static
{
}

pub async fn run(cli: Cli) -> Result<()> {
    let storage: Arc<dyn SessionStorage> = Arc::new(FileSessionStorage::new(&cli.session_file));

    if cli.offline {
        info!("using in-process backend");
        let api = Arc::new(MemoryApi::new());
        let mut app = App::new(api, storage);
        return app.execute(cli.command).await;
    }

    let mut config = ApiConfig::from_env().context("failed to load API configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = ApiConfig::new(base_url).base_url;
    }
    let api = Arc::new(HttpApi::new(config).context("failed to build HTTP client")?);

    let mut app = App::new(api.clone(), storage);
    if app.restore().await? {
        let token = app.sessions.session().token().map(str::to_string);
        api.set_token(token).await;
    }
    app.execute(cli.command).await
}

pub struct App<A: Backend> {
    client: SyncClient<A>,
    sessions: SessionManager,
    restored: bool,
}

impl<A: Backend> App<A> {
    pub fn new(api: Arc<A>, storage: Arc<dyn SessionStorage>) -> Self {
        let auth: Arc<dyn AuthApi> = api.clone();
        Self {
            client: SyncClient::new(StoreHandle::default(), api),
            sessions: SessionManager::new(auth, storage),
            restored: false,
        }
    }

    async fn restore(&mut self) -> Result<bool> {
        if !self.restored {
            self.restored = true;
            return self
                .sessions
                .restore()
                .await
                .context("failed to restore session");
        }
        Ok(self.sessions.session().is_authenticated())
    }

    pub async fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { email, password } => self.login(email, password).await,
            Command::Logout => {
                self.sessions
                    .logout(self.client.store())
                    .await
                    .context("failed to clear session")?;
                println!("Signed out");
                Ok(())
            }
            Command::Whoami => {
                self.restore().await?;
                match self.sessions.session().user() {
                    Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
                    None => println!("Not signed in"),
                }
                Ok(())
            }
            Command::MyProjects => self.my_projects().await,
            Command::Status => self.status().await,
            Command::Projects { action } => self.entity::<Project>(action).await,
            Command::Activities { action } => self.entity::<Activity>(action).await,
            Command::Metrics { action } => self.entity::<Metric>(action).await,
            Command::Reports { action } => self.entity::<Report>(action).await,
            Command::Users { action } => self.entity::<User>(action).await,
            Command::Preview { report_id } => self.preview(EntityId::new(report_id)).await,
            Command::Demo => self.demo().await,
        }
    }

    async fn login(&mut self, email: String, password: String) -> Result<()> {
        let session = self
            .sessions
            .login(&Credentials::new(email, password))
            .await
            .context("login failed")?;
        if let Some(user) = session.user() {
            println!("Signed in as {} ({})", user.name, user.role);
        }
        Ok(())
    }

    async fn my_projects(&mut self) -> Result<()> {
        self.restore().await?;
        let listing = self
            .sessions
            .session()
            .project_listing()
            .ok_or_else(|| anyhow!("not signed in; run `impactdesk login` first"))?;
        self.client
            .run(listing)
            .await
            .into_result()
            .context("failed to list projects")?;
        self.print_items::<Project>().await
    }

    async fn status(&mut self) -> Result<()> {
        for report in self.client.refresh_all().await {
            if let Some(failure) = report.failure() {
                println!("{:<11} failed: {}", report.kind.collection_name(), failure);
            }
        }
        let stats = self.client.store().read(|store| store.stats()).await;
        for stats in stats {
            println!(
                "{:<11} {:>5} item(s)  {}",
                stats.kind.collection_name(),
                stats.item_count,
                stats.lifecycle
            );
        }
        Ok(())
    }

    async fn entity<T>(&mut self, action: EntityAction) -> Result<()>
    where
        T: Stored,
        A: ResourceApi<T>,
    {
        let kind = T::KIND;
        match action {
            EntityAction::List(args) => {
                let op = match args.parent {
                    Some(parent) => SyncOperation::<T>::FetchByParent(EntityId::new(parent)),
                    None => SyncOperation::FetchAll,
                };
                self.client
                    .run(op)
                    .await
                    .into_result()
                    .with_context(|| format!("failed to list {}", kind.collection_name()))?;
                self.print_items::<T>().await
            }
            EntityAction::Get { id } => {
                let id = EntityId::new(id);
                self.client
                    .fetch_by_id::<T>(id.clone())
                    .await
                    .into_result()
                    .with_context(|| format!("failed to fetch {} '{}'", kind, id))?;
                self.print_one::<T>(&id).await
            }
            EntityAction::Create { json } => {
                let draft: <T as Entity>::Draft = serde_json::from_str(&json)
                    .with_context(|| format!("invalid {} payload", kind))?;
                self.client
                    .create::<T>(draft)
                    .await
                    .into_result()
                    .with_context(|| format!("failed to create {}", kind))?;
                let created = self
                    .client
                    .store()
                    .read(|store| store.collection::<T>().items().last().cloned())
                    .await
                    .ok_or_else(|| anyhow!("created {} missing from store", kind))?;
                println!("{}", serde_json::to_string_pretty(&created)?);
                Ok(())
            }
            EntityAction::Update { id, fields } => {
                let id = EntityId::new(id);
                let patch = parse_assignments(&fields)?;
                self.client
                    .update::<T>(id.clone(), patch)
                    .await
                    .into_result()
                    .with_context(|| format!("failed to update {} '{}'", kind, id))?;
                self.client
                    .fetch_by_id::<T>(id.clone())
                    .await
                    .into_result()
                    .with_context(|| format!("failed to reload {} '{}'", kind, id))?;
                self.print_one::<T>(&id).await
            }
            EntityAction::Delete { id } => {
                let id = EntityId::new(id);
                self.client
                    .delete::<T>(id.clone())
                    .await
                    .into_result()
                    .with_context(|| format!("failed to delete {} '{}'", kind, id))?;
                println!("Deleted {} {}", kind, id);
                Ok(())
            }
        }
    }

    async fn preview(&mut self, report_id: EntityId) -> Result<()> {
        self.client
            .fetch_by_id::<Report>(report_id.clone())
            .await
            .into_result()
            .with_context(|| format!("failed to fetch report '{}'", report_id))?;
        let report = self
            .client
            .store()
            .read(|store| store.reports().resolve(&report_id).cloned())
            .await
            .ok_or_else(|| anyhow!("report '{}' not found", report_id))?;

        let mut preview = DocumentPreview::for_report(&report)
            .ok_or_else(|| anyhow!("report '{}' has no document yet", report_id))?;
        let source = HttpDocumentSource::new(Duration::from_secs(30))?;

        match load_preview(&mut preview, &source).await {
            PreviewState::Rendered => {
                println!(
                    "{}: {} page(s) from {}",
                    preview.name(),
                    preview.page_count().unwrap_or(0),
                    preview.active_locator()
                );
            }
            PreviewState::Errored(failure) => {
                let download = preview.download_action();
                println!("{}: could not be rendered ({})", preview.name(), failure.reason);
                println!("Download instead: {}", download.locator);
            }
            PreviewState::Loading => return Err(anyhow!("preview did not finish loading")),
        }
        Ok(())
    }

    async fn demo(&mut self) -> Result<()> {
        let store = self.client.store().clone();

        self.client
            .create::<Project>(NewProject::named("Clean Water"))
            .await
            .into_result()
            .context("failed to create project")?;
        let project = store
            .read(|store| store.projects().items().last().cloned())
            .await
            .ok_or_else(|| anyhow!("project missing after create"))?;
        println!("Created project {} ({})", project.project_name, project.id);

        self.client
            .create::<Activity>(
                NewActivity::new(project.id.clone(), "Well survey").location("Kisumu"),
            )
            .await
            .into_result()
            .context("failed to create activity")?;
        self.client
            .fetch_by_parent::<Activity>(project.id.clone())
            .await
            .into_result()
            .context("failed to list activities")?;
        let activity = store
            .read(|store| store.activities().items().first().cloned())
            .await
            .ok_or_else(|| anyhow!("activity missing after fetch"))?;
        println!("Listed activity {} at {:?}", activity.activity_name, activity.location);

        let patch = EntityPatch::new().set("location", "Nakuru")?;
        self.client
            .update::<Activity>(activity.id.clone(), patch)
            .await
            .into_result()
            .context("failed to update activity")?;
        let location = store
            .read(|store| {
                store
                    .activities()
                    .find(&activity.id)
                    .and_then(|activity| activity.location.clone())
            })
            .await;
        println!("Moved activity to {:?}", location);

        self.client
            .delete::<Activity>(activity.id.clone())
            .await
            .into_result()
            .context("failed to delete activity")?;
        let remaining = store.read(|store| store.activities().len()).await;
        println!("Deleted activity; {} left", remaining);
        Ok(())
    }

    async fn print_items<T: Stored>(&self) -> Result<()> {
        let collection = self.client.store().snapshot::<T>().await;
        for item in collection.items() {
            println!("{}", serde_json::to_string(item)?);
        }
        if collection.is_empty() {
            println!("No {} found", T::KIND.collection_name());
        }
        Ok(())
    }

    async fn print_one<T: Stored>(&self, id: &EntityId) -> Result<()> {
        let entity = self
            .client
            .store()
            .read(|store| store.collection::<T>().resolve(id).cloned())
            .await
            .ok_or_else(|| anyhow!("{} '{}' not found", T::KIND, id))?;
        println!("{}", serde_json::to_string_pretty(&entity)?);
        Ok(())
    }
}

/// Parses `field=value` pairs into a patch. Values that are not valid JSON
/// are taken as strings.
fn parse_assignments(assignments: &[String]) -> Result<EntityPatch> {
    let mut patch = EntityPatch::new();
    for assignment in assignments {
        let (field, raw) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("expected field=value, got '{}'", assignment))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(anyhow!("empty field name in '{}'", assignment));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        patch.insert(field, value);
    }
    Ok(patch)
}
