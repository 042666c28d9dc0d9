// ── Provider: resource CRUD over the CMDB client ──
//
// Each operation is a straight line: resolve the vdom, validate and expand,
// make one API call, then refresh through `read` so the returned state is
// exactly what the appliance holds.

use fortiform_api::{FortiClient, SystemStatus};
use serde::Serialize;
use serde_json::{Map, Value};
use strum::Display;
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::convert::is_import_table;
use crate::diff::{AttrChange, ChangeKind, diff};
use crate::error::{CoreError, Verb};
use crate::expand::{ExpandMode, expand};
use crate::flatten::{FlattenOptions, flatten};
use crate::schema::{MkeyKind, PathTarget, Presence, ResourceSchema, SENSITIVE_MASK};
use crate::state::ResourceData;
use crate::subtable::SortMode;
use crate::validate::validate;

/// What an apply would do to the live object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    Create,
    Update,
    NoOp,
}

/// Result of comparing desired state with the live object.
///
/// Sensitive values in `changes` are masked.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub action: PlanAction,
    /// `None` when the appliance will assign an integer key on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mkey: Option<String>,
    pub changes: Vec<AttrChange>,
    /// Live state as flattened against the desired state.
    #[serde(skip)]
    pub live: Option<Map<String, Value>>,
}

impl Plan {
    /// The mkey, or a placeholder for an object not yet numbered.
    pub fn target(&self) -> &str {
        self.mkey.as_deref().unwrap_or("(new)")
    }
}

/// Orchestrates resource operations against one appliance.
pub struct Provider {
    client: FortiClient,
    vdom: String,
    sort: SortMode,
    import_table: Option<bool>,
}

impl Provider {
    /// Build a provider (and its HTTP client) from config.
    pub fn new(config: &ProviderConfig) -> Result<Self, CoreError> {
        let client = FortiClient::new(&config.host, &config.token, &config.transport())?;
        Ok(Self {
            client,
            vdom: config.vdom.clone(),
            sort: config.sort,
            import_table: config.import_table,
        })
    }

    /// Wrap an existing client; used by tests against a mock server.
    pub fn from_client(client: FortiClient, vdom: impl Into<String>) -> Self {
        Self {
            client,
            vdom: vdom.into(),
            sort: SortMode::False,
            import_table: None,
        }
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_import_table(mut self, import_table: Option<bool>) -> Self {
        self.import_table = import_table;
        self
    }

    fn vdom_for<'a>(&'a self, data: &'a ResourceData) -> &'a str {
        data.vdomparam().unwrap_or(&self.vdom)
    }

    fn import_tables(&self) -> bool {
        self.import_table.unwrap_or_else(is_import_table)
    }

    fn flatten_opts(&self, data: &ResourceData, importing: bool) -> FlattenOptions {
        FlattenOptions {
            sort: data.sort_override().unwrap_or(self.sort),
            all_tables: data.get_all_tables() || (importing && self.import_tables()),
        }
    }

    fn require_id(schema: &ResourceSchema, data: &ResourceData) -> Result<String, CoreError> {
        data.id.clone().ok_or(CoreError::MissingId {
            resource: schema.display_name,
        })
    }

    fn require_mkey(schema: &ResourceSchema, attrs: &Map<String, Value>) -> Result<String, CoreError> {
        schema.mkey_value(attrs).ok_or(CoreError::MissingMkey {
            resource: schema.display_name,
            attr: schema.mkey,
        })
    }

    // ── CRUD ─────────────────────────────────────────────────────────

    /// Create the object and refresh `data` from the appliance.
    pub async fn create(&self, schema: &ResourceSchema, data: &mut ResourceData) -> Result<(), CoreError> {
        validate(schema, data)?;
        let payload = expand(schema, data, ExpandMode::Create)?;
        let vdom = self.vdom_for(data).to_owned();

        let resp = self
            .client
            .create_object(schema.path, &payload, &vdom)
            .await
            .map_err(|e| CoreError::resource(Verb::Creating, schema.display_name, e))?;

        let id = match resp.mkey_string() {
            Some(id) => id,
            None => Self::require_mkey(schema, &data.attributes)?,
        };
        info!(resource = schema.type_name, mkey = %id, vdom = %vdom, "created");
        data.id = Some(id);
        self.read(schema, data).await
    }

    /// Refresh `data` from the appliance. A missing object clears the id.
    pub async fn read(&self, schema: &ResourceSchema, data: &mut ResourceData) -> Result<(), CoreError> {
        self.refresh(schema, data, Verb::Reading, false).await
    }

    async fn refresh(
        &self,
        schema: &ResourceSchema,
        data: &mut ResourceData,
        verb: Verb,
        importing: bool,
    ) -> Result<(), CoreError> {
        let id = Self::require_id(schema, data)?;
        let vdom = self.vdom_for(data).to_owned();

        let Some(live) = self
            .client
            .read_object(schema.path, &id, &vdom)
            .await
            .map_err(|e| CoreError::resource(verb, schema.display_name, e))?
        else {
            warn!(resource = schema.type_name, mkey = %id, "object not found, removing from state");
            data.id = None;
            return Ok(());
        };

        let opts = self.flatten_opts(data, importing);
        let prior = (!importing).then_some(&data.attributes);
        let mut attrs = flatten(schema, &live, prior, opts)?;
        attrs.extend(data.meta_attributes());
        debug!(resource = schema.type_name, mkey = %id, attrs = attrs.len(), "refreshed");
        data.attributes = attrs;
        Ok(())
    }

    /// Push changes since the prior state, then refresh.
    ///
    /// The id follows the mkey attribute, so a changed name renames the
    /// object in place.
    pub async fn update(&self, schema: &ResourceSchema, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = Self::require_id(schema, data)?;
        validate(schema, data)?;
        let payload = expand(schema, data, ExpandMode::Update)?;
        let vdom = self.vdom_for(data).to_owned();

        let resp = self
            .client
            .update_object(schema.path, &id, &payload, &vdom)
            .await
            .map_err(|e| CoreError::resource(Verb::Updating, schema.display_name, e))?;

        let new_id = resp
            .mkey_string()
            .or_else(|| schema.mkey_value(&data.attributes))
            .unwrap_or(id);
        info!(resource = schema.type_name, mkey = %new_id, vdom = %vdom, "updated");
        data.id = Some(new_id);
        data.take_prior();
        self.read(schema, data).await
    }

    /// Delete the object. An object already gone is not an error.
    pub async fn delete(&self, schema: &ResourceSchema, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = Self::require_id(schema, data)?;
        let vdom = self.vdom_for(data).to_owned();

        match self.client.delete_object(schema.path, &id, &vdom).await {
            Ok(_) => info!(resource = schema.type_name, mkey = %id, vdom = %vdom, "deleted"),
            Err(e) if e.is_not_found() => {
                warn!(resource = schema.type_name, mkey = %id, "object already deleted");
            }
            Err(e) => return Err(CoreError::resource(Verb::Deleting, schema.display_name, e)),
        }
        data.id = None;
        Ok(())
    }

    /// Read an existing object into fresh state.
    ///
    /// Subtables are populated when `all_tables` is set or imports are
    /// configured to include them.
    pub async fn import(
        &self,
        schema: &ResourceSchema,
        mkey: &str,
        vdom: Option<&str>,
        all_tables: bool,
    ) -> Result<ResourceData, CoreError> {
        let mut data = ResourceData::default().with_id(mkey);
        if let Some(vdom) = vdom.filter(|v| !v.is_empty()) {
            data.set("vdomparam", Value::String(vdom.to_owned()));
        }
        if all_tables {
            data.set("get_all_tables", Value::Bool(true));
        }

        self.refresh(schema, &mut data, Verb::Importing, true).await?;
        if data.id.is_none() {
            return Err(CoreError::NotFound {
                resource: schema.display_name,
                mkey: mkey.to_owned(),
            });
        }
        info!(resource = schema.type_name, mkey, "imported");
        Ok(data)
    }

    /// Reset every writable field of an existing object to its default.
    pub async fn reset(&self, schema: &ResourceSchema, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = Self::require_id(schema, data)?;
        let payload = expand(schema, data, ExpandMode::UnsetAll)?;
        let vdom = self.vdom_for(data).to_owned();

        self.client
            .update_object(schema.path, &id, &payload, &vdom)
            .await
            .map_err(|e| CoreError::resource(Verb::Resetting, schema.display_name, e))?;
        info!(resource = schema.type_name, mkey = %id, fields = payload.len(), "reset");
        self.read(schema, data).await
    }

    /// Every object of a table, flattened without prior state.
    pub async fn list(
        &self,
        schema: &ResourceSchema,
        vdom: Option<&str>,
        all_tables: bool,
    ) -> Result<Vec<ResourceData>, CoreError> {
        let vdom = vdom.unwrap_or(&self.vdom);
        let objects = self
            .client
            .list_objects(schema.path, vdom)
            .await
            .map_err(|e| CoreError::resource(Verb::Reading, schema.display_name, e))?;

        let opts = FlattenOptions {
            sort: self.sort,
            all_tables,
        };
        objects
            .iter()
            .map(|obj| {
                let attrs = flatten(schema, obj, None, opts)?;
                let id = schema.mkey_value(&attrs);
                let data = ResourceData::new(attrs);
                Ok(match id {
                    Some(id) => data.with_id(id),
                    None => data,
                })
            })
            .collect()
    }

    // ── Plan / apply ─────────────────────────────────────────────────

    /// Compare `desired` with the live object identified by its mkey.
    ///
    /// Resources keyed by an integer may omit it; that always plans a
    /// create. Sensitive values set in `desired` always count as changed,
    /// since the appliance never returns them.
    pub async fn plan(&self, schema: &ResourceSchema, desired: &ResourceData) -> Result<Plan, CoreError> {
        validate(schema, desired)?;
        let Some(mkey) = schema.mkey_value(&desired.attributes) else {
            if schema.mkey_kind == MkeyKind::Int {
                debug!(resource = schema.type_name, "no mkey given, appliance will assign one");
                return Ok(creation_plan(schema, desired, None));
            }
            return Err(CoreError::MissingMkey {
                resource: schema.display_name,
                attr: schema.mkey,
            });
        };
        let vdom = self.vdom_for(desired);

        let live = self
            .client
            .read_object(schema.path, &mkey, vdom)
            .await
            .map_err(|e| CoreError::resource(Verb::Reading, schema.display_name, e))?;

        let Some(live) = live else {
            return Ok(creation_plan(schema, desired, Some(mkey)));
        };

        let prior = schema.without_sensitive(&desired.attributes);
        let flat = flatten(schema, &live, Some(&prior), self.flatten_opts(desired, false))?;
        let live_attrs = comparable_live(schema, flat, &desired.attributes);
        let mut changes = diff(&live_attrs, &desired_attrs(schema, desired));
        for change in &mut changes {
            if change.kind == ChangeKind::Added && is_sensitive_leaf(schema, &change.path) {
                change.kind = ChangeKind::Changed;
                change.before = Some(Value::String(SENSITIVE_MASK.to_owned()));
            }
        }
        mask_changes(schema, &mut changes);

        Ok(Plan {
            action: if changes.is_empty() {
                PlanAction::NoOp
            } else {
                PlanAction::Update
            },
            changes,
            mkey: Some(mkey),
            live: Some(live_attrs),
        })
    }

    /// Create or update so the appliance matches `desired`.
    ///
    /// Returns the plan that was carried out and the refreshed state.
    pub async fn apply(
        &self,
        schema: &ResourceSchema,
        desired: ResourceData,
    ) -> Result<(Plan, ResourceData), CoreError> {
        let plan = self.plan(schema, &desired).await?;
        let mut data = match plan.mkey.clone() {
            Some(mkey) => desired.with_id(mkey),
            None => desired,
        };

        match (plan.action, plan.live.clone()) {
            (PlanAction::Create, _) => self.create(schema, &mut data).await?,
            (PlanAction::Update, Some(live)) => {
                data = data.with_prior(live);
                self.update(schema, &mut data).await?;
            }
            _ => {
                debug!(resource = schema.type_name, mkey = plan.target(), "no changes");
                self.read(schema, &mut data).await?;
            }
        }
        Ok((plan, data))
    }

    /// Appliance identity and firmware version.
    pub async fn system_status(&self) -> Result<SystemStatus, CoreError> {
        self.client
            .system_status()
            .await
            .map_err(|e| CoreError::resource(Verb::Reading, "SystemStatus", e))
    }
}

fn creation_plan(schema: &ResourceSchema, desired: &ResourceData, mkey: Option<String>) -> Plan {
    let mut changes = diff(&Map::new(), &desired_attrs(schema, desired));
    mask_changes(schema, &mut changes);
    Plan {
        action: PlanAction::Create,
        mkey,
        changes,
        live: None,
    }
}

fn is_sensitive_leaf(schema: &ResourceSchema, path: &str) -> bool {
    matches!(schema.resolve_path(path), Some(PathTarget::Field(f)) if f.sensitive)
}

fn mask_changes(schema: &ResourceSchema, changes: &mut [AttrChange]) {
    for change in changes {
        for value in [change.before.as_mut(), change.after.as_mut()].into_iter().flatten() {
            schema.mask_at(&change.path, value);
        }
    }
}

/// Desired attributes as they would be stored: computed values dropped.
fn desired_attrs(schema: &ResourceSchema, desired: &ResourceData) -> Map<String, Value> {
    desired
        .attributes
        .iter()
        .filter(|(k, _)| {
            schema
                .field(k)
                .is_some_and(|f| f.presence != Presence::Computed)
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Drop live values the user does not manage: computed fields and
/// optional-computed fields absent from the desired state.
fn comparable_live(
    schema: &ResourceSchema,
    mut live: Map<String, Value>,
    desired: &Map<String, Value>,
) -> Map<String, Value> {
    live.retain(|k, _| match schema.field(k).map(|f| f.presence) {
        Some(Presence::Computed) | None => false,
        Some(Presence::OptionalComputed) => desired.contains_key(k),
        Some(Presence::Required | Presence::Optional) => true,
    });
    live
}
