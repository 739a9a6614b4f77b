pub mod jenkins_integration;
pub mod jenkins_response;
pub mod remote_integration;

pub use self::jenkins_integration::JenkinsIntegration;
pub use self::remote_integration::RemoteIntegration;
