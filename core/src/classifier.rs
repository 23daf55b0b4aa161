//! Maps what a transport reports into a single `ResponseOutcome`.

use crate::error::{NetworkError, TransportError};
use crate::http::ResponseMeta;

/// The one result produced for every request.
#[derive(Debug)]
pub enum ResponseOutcome {
    Success(Vec<u8>),
    Failure(NetworkError),
}

impl ResponseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<Vec<u8>, NetworkError> {
        match self {
            ResponseOutcome::Success(data) => Ok(data),
            ResponseOutcome::Failure(err) => Err(err),
        }
    }
}

impl From<NetworkError> for ResponseOutcome {
    fn from(err: NetworkError) -> Self {
        ResponseOutcome::Failure(err)
    }
}

/// Classify a transport reply.
///
/// Checked in order: a transport error wins over everything else, a missing
/// response is unknown, a 2xx needs data to count as success (zero-length
/// data still does), and any other status is an HTTP error.
pub fn classify(
    data: Option<Vec<u8>>,
    response: Option<ResponseMeta>,
    error: Option<TransportError>,
) -> ResponseOutcome {
    if let Some(error) = error {
        return ResponseOutcome::Failure(NetworkError::System(error));
    }
    let Some(response) = response else {
        return ResponseOutcome::Failure(NetworkError::Unknown);
    };
    if !response.is_success() {
        return ResponseOutcome::Failure(NetworkError::Http {
            status_code: response.status,
        });
    }
    match data {
        Some(data) => ResponseOutcome::Success(data),
        None => ResponseOutcome::Failure(NetworkError::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;

    fn transport_error() -> TransportError {
        Box::new(SessionError::Cancelled)
    }

    #[test]
    fn transport_error_wins_over_response_and_data() {
        let outcome = classify(
            Some(b"{}".to_vec()),
            Some(ResponseMeta::new(200)),
            Some(transport_error()),
        );
        assert!(matches!(outcome, ResponseOutcome::Failure(NetworkError::System(_))));
    }

    #[test]
    fn transport_error_alone_is_system_error() {
        let outcome = classify(None, None, Some(transport_error()));
        match outcome {
            ResponseOutcome::Failure(NetworkError::System(err)) => {
                assert_eq!(err.to_string(), "request was cancelled")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn missing_response_is_unknown() {
        let outcome = classify(Some(b"{}".to_vec()), None, None);
        assert!(matches!(outcome, ResponseOutcome::Failure(NetworkError::Unknown)));
    }

    #[test]
    fn success_status_with_data_is_success() {
        for status in [200, 201, 204, 299] {
            let outcome = classify(Some(br#"{"id":1}"#.to_vec()), Some(ResponseMeta::new(status)), None);
            assert_eq!(outcome.into_result().unwrap(), br#"{"id":1}"#.to_vec(), "status {status}");
        }
    }

    #[test]
    fn success_status_without_data_is_unknown() {
        let outcome = classify(None, Some(ResponseMeta::new(200)), None);
        assert!(matches!(outcome, ResponseOutcome::Failure(NetworkError::Unknown)));
    }

    #[test]
    fn success_status_with_empty_data_is_success() {
        let outcome = classify(Some(Vec::new()), Some(ResponseMeta::new(204)), None);
        assert!(outcome.is_success());
        assert!(outcome.into_result().unwrap().is_empty());
    }

    #[test]
    fn non_success_status_is_http_error_regardless_of_data() {
        for status in [100, 199, 300, 304, 404, 500, 503] {
            let outcome = classify(Some(b"oops".to_vec()), Some(ResponseMeta::new(status)), None);
            assert!(
                matches!(outcome, ResponseOutcome::Failure(NetworkError::Http { status_code }) if status_code == status),
                "status {status}"
            );
        }
    }

    #[test]
    fn http_error_without_data() {
        let outcome = classify(None, Some(ResponseMeta::new(500)), None);
        assert!(matches!(
            outcome,
            ResponseOutcome::Failure(NetworkError::Http { status_code: 500 })
        ));
    }
}
