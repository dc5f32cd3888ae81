use uuid::Uuid;

/// Per-request context inserted by the request-id middleware.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Uuid,
}

impl RequestContext {
    pub fn new(request_id: Uuid) -> Self {
        Self { request_id }
    }

    /// Time-ordered (v7) id, echoed in the `x-request-id` response header.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}
