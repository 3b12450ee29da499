use serde::{Deserialize, Serialize};

/// Sequence number attached to an outgoing service request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Search,
    Preview,
    Route,
}

/// Latest token issued per request kind. Tokens only ever increase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTokens {
    search: u64,
    preview: u64,
    route: u64,
}

impl RequestTokens {
    fn counter(&mut self, kind: RequestKind) -> &mut u64 {
        match kind {
            RequestKind::Search => &mut self.search,
            RequestKind::Preview => &mut self.preview,
            RequestKind::Route => &mut self.route,
        }
    }

    fn current(&self, kind: RequestKind) -> u64 {
        match kind {
            RequestKind::Search => self.search,
            RequestKind::Preview => self.preview,
            RequestKind::Route => self.route,
        }
    }

    pub fn issue(&mut self, kind: RequestKind) -> RequestToken {
        let counter = self.counter(kind);
        *counter += 1;
        RequestToken(*counter)
    }

    /// Supersedes every outstanding request of `kind` without issuing a new one
    pub fn invalidate(&mut self, kind: RequestKind) {
        *self.counter(kind) += 1;
    }

    pub fn is_latest(&self, kind: RequestKind, token: RequestToken) -> bool {
        self.current(kind) == token.0
    }
}
