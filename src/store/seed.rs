//! Seed list for the keyword response table
//!
//! The seed list is plain data: the built-in persona table below, or a JSON
//! file of `{ "keyword": ..., "response": ... }` rows supplied at startup.

use super::schema::NewChatResponse;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Keyword consulted when no token of an utterance matches
pub const DEFAULT_KEYWORD: &str = "default";

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read seed file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid seed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Seed list has no \"default\" entry")]
    MissingDefault,
    #[error("Seed entry {0} has an empty keyword")]
    EmptyKeyword(usize),
}

/// Validated keyword/response rows. Always contains a `"default"` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedList {
    entries: Vec<NewChatResponse>,
}

impl SeedList {
    /// Validate a list of rows
    pub fn new(entries: Vec<NewChatResponse>) -> Result<Self, SeedError> {
        if let Some(index) = entries.iter().position(|e| e.keyword.trim().is_empty()) {
            return Err(SeedError::EmptyKeyword(index));
        }
        if !entries
            .iter()
            .any(|e| e.keyword.eq_ignore_ascii_case(DEFAULT_KEYWORD))
        {
            return Err(SeedError::MissingDefault);
        }
        Ok(Self { entries })
    }

    /// Parse and validate a JSON array of rows
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let entries: Vec<NewChatResponse> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Read a seed file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The persona table shipped with the site
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(keyword, response)| NewChatResponse::new(*keyword, *response))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[NewChatResponse] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

const BUILTIN: &[(&str, &str)] = &[
    ("who are you", "I am Srikar Kodi's AI assistant, designed to provide information about his professional background, skills, and projects to potential employers and collaborators."),
    ("name", "This is Srikar Kodi's professional portfolio. He is a dedicated Full Stack Python & AI Enthusiast with a strong background in developing intelligent web solutions and robust data pipelines."),
    ("born", "Srikar is based in Visakhapatnam, Andhra Pradesh, India."),
    ("education", "Srikar holds a Bachelor's degree in Electronics and Communication Engineering from MVGR College of Engineering, providing a solid foundation for his technical career."),
    ("work experience", "Srikar has 3 years of professional experience, including 2 years in Application Development at Vavili Technologies, where he contributed to full-stack web applications like TemplesWiki, and 1 year in Quality Assurance at ValueLabs, focusing on test plan development and software quality."),
    ("hobbies", "Beyond professional work, Srikar is passionate about developing AI projects, optimizing data engineering solutions, and creating innovative software applications."),
    ("projects", "Srikar's portfolio includes impactful projects like Cipher (a personal chatbot assistant), a Dataset Translator App, and contributions to TemplesWiki. These demonstrate his expertise in full-stack development, AI, and data engineering. More details are available in the Projects section."),
    ("contact", "You can connect with Srikar via his LinkedIn and GitHub profiles, linked in the Contact section of this website, or by using the direct contact form."),
    ("skills", "Srikar's core technical skills include Python, SQL, PostgreSQL, Flask, Django, AWS, Docker, Kubernetes, ETL development, data visualization, and proficiency in AI/ML frameworks like TensorFlow and PyTorch."),
    ("hello", "Hello! I'm here to assist you with any professional inquiries about Srikar Kodi. How can I help you today?"),
    ("hi", "Hi there! Feel free to ask me anything about Srikar's professional experience, technical skills, or projects."),
    ("linkedin", "You can find Srikar Kodi's professional LinkedIn profile in the Contact section of this website for more details on his career journey."),
    ("github", "Srikar's GitHub username is Namidok. His repositories showcase his coding style and project contributions. You can find the link in the Contact section."),
    ("resume", "For a comprehensive overview of Srikar's qualifications, please refer to his resume, accessible via the 'View Resume' button on the About page."),
    ("current work", "Srikar is currently focused on developing full-stack applications that integrate AI technologies, specializing in Python backends and modern frontend frameworks."),
    ("data engineering", "Srikar possesses strong expertise in data engineering, including building robust ETL pipelines, data transformation, and data management using Python and SQL."),
    ("python", "Srikar is highly proficient in Python, leveraging it for backend development, data engineering, AI/ML applications, and scripting."),
    ("chatbot", "Srikar has developed 'Cipher,' a personal chatbot assistant, demonstrating his capabilities in natural language processing and conversational AI development."),
    ("location", "Srikar is currently located in Visakhapatnam, Andhra Pradesh, India, and is open to remote opportunities."),
    (DEFAULT_KEYWORD, "I can provide more details about Srikar's professional experience, technical skills, or specific projects. Please ask a more specific question related to his professional profile."),
];
