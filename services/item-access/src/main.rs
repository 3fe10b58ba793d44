//! Item Access 探针
//!
//! 从 stdin 读取一个 JSON 请求，按配置构建引擎并输出访问决策。
//!
//! 环境变量：
//! - `LOCKBOX_CONFIG_DIR`: 配置目录，默认 `config`
//! - `APP_ENV`: 环境名，决定加载 `{APP_ENV}.toml`

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use item_access::domain::GroupMembershipProvider;
use item_access::infrastructure::{
    CacheBulkInvalidator, DecisionCache, DecisionCacheConfig, ProfileCapabilityChecker,
    StaticGroupDirectory, TracingEventSink, build_cache_store,
};
use item_access::{ActorContext, AuthorizationService, GrantSnapshot};
use lockbox_common::{ActionId, GroupId};
use lockbox_config::AppConfig;
use serde::Deserialize;
use tracing::{info, warn};

/// 探针请求
#[derive(Debug, Deserialize)]
struct ProbeRequest {
    actor: ActorContext,
    snapshot: GrantSnapshot,
    /// 主体所属的全部用户组
    #[serde(default)]
    memberships: Vec<GroupId>,
    #[serde(default)]
    action_id: ActionId,
    #[serde(default)]
    is_history: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config_dir = std::env::var("LOCKBOX_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config = AppConfig::load(&config_dir).context("failed to load configuration")?;

    if config.telemetry.json {
        lockbox_telemetry::init_tracing_json(&config.telemetry.log_level);
    } else {
        lockbox_telemetry::init_tracing(&config.telemetry.log_level);
    }
    if let Err(e) = lockbox_telemetry::init_metrics() {
        warn!(error = %e, "Metrics recorder not installed");
    }

    info!(app = %config.app_name, env = %config.app_env, "Starting item access probe");

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read request from stdin")?;
    let request: ProbeRequest = serde_json::from_str(&input).context("invalid probe request")?;

    let store = build_cache_store(&config).await?;
    let memberships: Arc<dyn GroupMembershipProvider> = Arc::new(
        StaticGroupDirectory::new().with_user(request.actor.user_id, request.memberships),
    );
    let cache = Arc::new(
        DecisionCache::new(store.clone(), memberships, Arc::new(ProfileCapabilityChecker))
            .with_settings(Arc::new(config.access.clone()))
            .with_event_sink(Arc::new(TracingEventSink))
            .with_config(DecisionCacheConfig::from(&config.access.cache)),
    );
    let invalidator = Arc::new(CacheBulkInvalidator::new(
        store,
        config.access.cache.key_prefix.clone(),
    ));

    let service = AuthorizationService::new(cache, request.actor).with_invalidator(invalidator);
    let decision = service
        .get_acl(request.action_id, &request.snapshot, request.is_history)
        .await?;

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
