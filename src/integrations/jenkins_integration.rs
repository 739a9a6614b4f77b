use channels::JobMap;
use errors::FetchError;
use integrations::jenkins_response::*;
use integrations::remote_integration::RemoteIntegration;
use network::{get_url_body, parse_body};

pub struct JenkinsIntegration {
    name: String,
    url: String,
}

impl JenkinsIntegration {
    pub fn new(name: &str, url: &str) -> JenkinsIntegration {
        JenkinsIntegration {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Turn a Jenkins job list into the board's job map.
pub fn to_job_map(response: JenkinsJobResponse) -> JobMap {
    response
        .jobs
        .into_iter()
        .map(|job| {
            let status = job.color.to_status();
            (job.name, status)
        })
        .collect()
}

pub fn parse_job_list(url: &str, body: &str) -> Result<JobMap, FetchError> {
    parse_body::<JenkinsJobResponse>(body)
        .map(to_job_map)
        .map_err(|e| FetchError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
}

impl RemoteIntegration for JenkinsIntegration {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_jobs(&self) -> Result<JobMap, FetchError> {
        let body = get_url_body(&self.url).map_err(|e| FetchError::Http {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        let jobs = parse_job_list(&self.url, &body)?;
        let running = jobs.values().filter(|s| s.running).count();
        info!(
            "--Jenkins--: Retrieved {} jobs from {} ({}), {} of them running.",
            jobs.len(),
            self.name,
            self.url,
            running
        );
        Ok(jobs)
    }
}
