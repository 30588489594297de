//! HTTP serving of archives and bootstrap scripts.

use std::sync::Arc;

use tracing::info;

use crate::app::AppContext;
use crate::domain::AppError;
use crate::ports::{ArchiveStore, RoleFileSource};
use crate::services::{CapabilityRouter, HttpServer, MinijinjaScriptRenderer, TlsMaterial};

/// A bound server together with the router it will dispatch to.
pub struct BoundServer<A: ArchiveStore> {
    pub server: HttpServer,
    pub router: Arc<CapabilityRouter<A, MinijinjaScriptRenderer>>,
}

/// Bind the configured listen address and build the router.
pub fn bind<R, A>(ctx: AppContext<R, A>) -> Result<BoundServer<A>, AppError>
where
    R: RoleFileSource,
    A: ArchiveStore,
{
    let (settings, registry, archives) = ctx.into_parts();

    let tls = match &settings.listen.tls {
        Some(paths) => Some(TlsMaterial::from_files(&paths.cert, &paths.key)?),
        None => None,
    };

    let address = settings.listen.address();
    let server = HttpServer::bind(&address, tls)?;
    info!(
        %address,
        tls = settings.listen.tls.is_some(),
        hosts = registry.hosts().count(),
        scripts = registry.scripts().count(),
        url_prefix = %settings.url_prefix,
        "server bound"
    );

    let router = CapabilityRouter::new(
        registry,
        settings.url_prefix,
        archives,
        MinijinjaScriptRenderer::new(),
    );

    Ok(BoundServer { server, router: Arc::new(router) })
}

/// Serve until the process is stopped.
pub fn execute<R, A>(ctx: AppContext<R, A>) -> Result<(), AppError>
where
    R: RoleFileSource,
    A: ArchiveStore + Send + Sync + 'static,
{
    let BoundServer { server, router } = bind(ctx)?;
    server.run(router)
}
