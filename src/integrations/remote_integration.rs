use channels::JobMap;
use errors::FetchError;

/// A CI server the board can show jobs from.
pub trait RemoteIntegration {
    fn name(&self) -> &str;
    fn get_jobs(&self) -> Result<JobMap, FetchError>;
}
