//! Ordered fallthrough resolution over HTTP lookup services.

use crate::address::Address;
use crate::http::{HttpClient, HttpRequest};

use super::{ResolveError, ResolverService, ServiceError, ServiceFailure, default_services};

/// Trait for determining the current external address.
///
/// The monitor loop depends on this abstraction so tests can script
/// address sequences without touching the network.
pub trait AddressSource: Send + Sync {
    /// Determines the current external address.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Exhausted`] when no source yielded an address.
    fn resolve(&self) -> impl std::future::Future<Output = Result<Address, ResolveError>> + Send;
}

/// Resolves the external address by querying lookup services in order.
///
/// Each service gets exactly one request. Transport errors, non-2xx
/// statuses, unparseable bodies and unrecognized shapes are logged as a
/// warning and the next service is tried. The first usable answer wins.
///
/// # Example
///
/// ```no_run
/// use ipwatch::http::ReqwestClient;
/// use ipwatch::resolver::{AddressSource, HttpResolver};
///
/// # async fn example() -> Result<(), ipwatch::resolver::ResolveError> {
/// let resolver = HttpResolver::new(ReqwestClient::new());
/// let address = resolver.resolve().await?;
/// println!("{address}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpResolver<H> {
    client: H,
    services: Vec<ResolverService>,
}

impl<H> HttpResolver<H> {
    /// Creates a resolver using the default service list.
    #[must_use]
    pub fn new(client: H) -> Self {
        Self::with_services(client, default_services())
    }

    /// Creates a resolver with an explicit, ordered service list.
    #[must_use]
    pub const fn with_services(client: H, services: Vec<ResolverService>) -> Self {
        Self { client, services }
    }

    /// Returns the configured services in query order.
    #[must_use]
    pub fn services(&self) -> &[ResolverService] {
        &self.services
    }
}

impl<H: HttpClient> HttpResolver<H> {
    /// Queries a single service.
    async fn query(&self, service: &ResolverService) -> Result<Address, ServiceError> {
        let response = self
            .client
            .request(HttpRequest::get(service.url().clone()))
            .await?;

        if !response.is_success() {
            return Err(ServiceError::Status(response.status));
        }

        let body: serde_json::Value =
            serde_json::from_slice(&response.body).map_err(ServiceError::InvalidBody)?;

        service
            .extract(&body)
            .ok_or(ServiceError::UnrecognizedShape)
    }
}

impl<H: HttpClient> AddressSource for HttpResolver<H> {
    async fn resolve(&self) -> Result<Address, ResolveError> {
        let mut failures = Vec::new();

        for service in &self.services {
            tracing::debug!("Querying {}", service.url());

            match self.query(service).await {
                Ok(address) => {
                    tracing::debug!("{} reported {address}", service.url());
                    return Ok(address);
                }
                Err(error) => {
                    tracing::warn!("Address lookup via {} failed: {error}", service.url());
                    failures.push(ServiceFailure {
                        service: service.url().to_string(),
                        error,
                    });
                }
            }
        }

        Err(ResolveError::Exhausted { failures })
    }
}
