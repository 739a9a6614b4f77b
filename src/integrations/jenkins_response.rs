use status::{Color, Status};

#[derive(Deserialize)]
pub struct JenkinsJobResponse {
    // Absent when the URL does not point at a job list; treated as no jobs.
    #[serde(default)]
    pub jobs: Vec<JenkinsJob>,
}

#[derive(Deserialize)]
pub struct JenkinsJob {
    pub name: String,
    #[serde(default)]
    pub color: JenkinsJobColor,
}

#[derive(Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum JenkinsJobColor {
    Red,
    RedAnime,
    Yellow,
    YellowAnime,
    Blue,
    BlueAnime,
    Grey,
    GreyAnime,
    Disabled,
    DisabledAnime,
    Aborted,
    AbortedAnime,
    Notbuilt,
    NotbuiltAnime,
    #[serde(other)]
    Unknown,
}

impl Default for JenkinsJobColor {
    fn default() -> JenkinsJobColor {
        JenkinsJobColor::Unknown
    }
}

impl JenkinsJobColor {
    /// Jenkins appends "_anime" to the ball color while a build runs.
    pub fn is_running(&self) -> bool {
        match *self {
            JenkinsJobColor::RedAnime
            | JenkinsJobColor::YellowAnime
            | JenkinsJobColor::BlueAnime
            | JenkinsJobColor::GreyAnime
            | JenkinsJobColor::DisabledAnime
            | JenkinsJobColor::AbortedAnime
            | JenkinsJobColor::NotbuiltAnime => true,
            _ => false,
        }
    }

    pub fn to_status(&self) -> Status {
        let color = match *self {
            // Blue is green
            JenkinsJobColor::Blue | JenkinsJobColor::BlueAnime => Color::Green,
            JenkinsJobColor::Red | JenkinsJobColor::RedAnime => Color::Red,
            JenkinsJobColor::Yellow | JenkinsJobColor::YellowAnime => Color::Yellow,
            JenkinsJobColor::Aborted | JenkinsJobColor::AbortedAnime => Color::Yellow,
            // Disabled, not built, grey and anything newer stay dark
            _ => Color::Blank,
        };
        Status::new(color, self.is_running())
    }
}
