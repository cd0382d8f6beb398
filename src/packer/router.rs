//! Route dispatch
//!
//! Maps request route codes to handlers that decode a frame and pack the reply.

use std::collections::HashMap;
use std::sync::Arc;

use super::Packer;
use crate::error::{Result, WireError};
use crate::pool::PooledBuffer;

/// Turns a raw request frame into a packed response frame
pub type Handler = Box<dyn Fn(&[u8]) -> Result<PooledBuffer> + Send + Sync>;

/// Route code → handler table
#[derive(Default)]
pub struct Router {
    handlers: HashMap<i8, Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw handler for `route`, replacing any previous one
    pub fn register(&mut self, route: i8, handler: Handler) {
        if self.handlers.insert(route, handler).is_some() {
            tracing::debug!("Replacing handler for route {}", route);
        }
    }

    /// Serve `packer`'s request route with `service`
    ///
    /// The frame is unpacked, passed to `service`, and the result packed as
    /// the response.
    pub fn serve<P, F>(&mut self, packer: Arc<P>, service: F)
    where
        P: Packer + 'static,
        F: Fn(P::Request) -> P::Response + Send + Sync + 'static,
    {
        let route = packer.request_route();
        self.register(
            route,
            Box::new(move |data: &[u8]| {
                let req = packer.unpack_request(data)?;
                packer.pack_response(&service(req))
            }),
        );
    }

    pub fn contains(&self, route: i8) -> bool {
        self.handlers.contains_key(&route)
    }

    /// Run the handler for `route` on a full frame
    pub fn dispatch(&self, route: i8, data: &[u8]) -> Result<PooledBuffer> {
        let handler = self.handlers.get(&route).ok_or(WireError::UnknownRoute(route))?;
        handler(data)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<i8> = self.handlers.keys().copied().collect();
        routes.sort_unstable();
        f.debug_struct("Router").field("routes", &routes).finish()
    }
}
