//! The request batch builder (spec §4.3): constructs request batches that
//! vary either by name or by record type against a fixed server. Grounded
//! in original_source/factory.go's `RequestFactory`; owns no runtime state.
use crate::request::{Request, RequestOptions};
use crate::wire::QType;

/// Builds batches of [`Request`]s sharing a caller-supplied set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBatch {
    options: RequestOptions,
}

impl RequestBatch {
    pub fn new(options: RequestOptions) -> Self {
        RequestBatch { options }
    }

    /// One request per name, same server/type/options.
    pub fn from_names(&self, addr: &str, qtype: QType, names: &[&str]) -> Vec<Request> {
        names
            .iter()
            .map(|name| Request::new(addr, *name, qtype, self.options))
            .collect()
    }

    /// One request per type, same server/name/options.
    pub fn from_types(&self, addr: &str, name: &str, types: &[QType]) -> Vec<Request> {
        types
            .iter()
            .map(|qtype| Request::new(addr, name, *qtype, self.options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_names_shares_server_type_and_options() {
        let batch = RequestBatch::new(RequestOptions::new().set_rd(true));
        let requests = batch.from_names("1.1.1.1", QType::A, &["a.example.", "b.example."]);

        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.addr == "1.1.1.1:53"));
        assert!(requests.iter().all(|r| r.qtype == QType::A));
        assert!(requests.iter().all(|r| r.recursion_desired));
        assert_eq!(requests[0].name.fqdn(), "a.example.");
        assert_eq!(requests[1].name.fqdn(), "b.example.");
    }

    #[test]
    fn from_types_shares_server_name_and_options() {
        let batch = RequestBatch::new(RequestOptions::new());
        let requests = batch.from_types("1.1.1.1", "example.com", &[QType::A, QType::AAAA, QType::NS]);

        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.name.fqdn() == "example.com."));
        assert_eq!(requests[0].qtype, QType::A);
        assert_eq!(requests[1].qtype, QType::AAAA);
        assert_eq!(requests[2].qtype, QType::NS);
    }
}
