use std::path::PathBuf;
use clap::Parser;
use tracing::Level;

#[derive(Parser, Clone, Debug)]
#[clap(name = "eat-where", about = "Find a place to eat, one question at a time")]
pub struct Config {
    /// Bearer token for the search API, only needed when a city is not cached yet
    #[clap(env, long)]
    pub yelp_api_key: Option<String>,

    #[clap(env, long, default_value = "https://api.yelp.com/v3/businesses/search")]
    pub search_endpoint: String,

    #[clap(env, long, default_value = "food")]
    pub search_term: String,

    #[clap(env, long, default_value_t = 50)]
    pub page_size: usize,

    #[clap(env, long, default_value_t = 1000)]
    pub max_results: usize,

    #[clap(env, long, default_value = ".")]
    pub cache_dir: PathBuf,

    #[clap(env, long, default_value = "tree.json")]
    pub trace_path: PathBuf,

    /// How many unmatched food types are tolerated before giving up, 0 asks forever
    #[clap(env, long, default_value_t = 3)]
    pub type_filter_attempts: usize,

    #[clap(env, long, default_value = "warn")]
    pub log_level: Level,

    /// Print the funnel recorded in the trace file and exit
    #[clap(long)]
    pub show_trace: bool,
}

impl Config {
    /// `None` means the type filter keeps asking until something matches.
    pub fn type_attempt_limit(&self) -> Option<usize> {
        match self.type_filter_attempts {
            0 => None,
            n => Some(n),
        }
    }
}

#[cfg(test)]
impl Config {
    /// Default settings without reading the environment.
    pub fn for_tests() -> Config {
        Config {
            yelp_api_key: None,
            search_endpoint: "https://api.yelp.com/v3/businesses/search".to_string(),
            search_term: "food".to_string(),
            page_size: 50,
            max_results: 1000,
            cache_dir: PathBuf::from("."),
            trace_path: PathBuf::from("tree.json"),
            type_filter_attempts: 3,
            log_level: Level::WARN,
            show_trace: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn default_of(id: &str) -> String {
        let command = Config::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .unwrap();
        arg.get_default_values()[0].to_string_lossy().into_owned()
    }

    #[test]
    fn defaults_match_the_search_api_window() {
        assert_eq!(default_of("page_size"), "50");
        assert_eq!(default_of("max_results"), "1000");
        assert_eq!(default_of("search_term"), "food");
        assert_eq!(default_of("trace_path"), "tree.json");
        assert_eq!(default_of("type_filter_attempts"), "3");
        assert_eq!(Config::for_tests().type_attempt_limit(), Some(3));
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from(["eat-where", "--type-filter-attempts", "0", "--page-size", "20"]);
        assert_eq!(config.type_attempt_limit(), None);
        assert_eq!(config.page_size, 20);
    }
}
