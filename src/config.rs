use crate::error::{Error, Result};

/// Sort order for the policy catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Year descending
    #[default]
    Newest,
    /// Approval ratio descending, unvoted policies last
    PopularityDesc,
    /// Approval ratio ascending, unvoted policies still last
    PopularityAsc,
}

impl From<&str> for SortOrder {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "popularity_desc" => SortOrder::PopularityDesc,
            "popularity_asc" => SortOrder::PopularityAsc,
            _ => SortOrder::Newest,
        }
    }
}

/// Time resolution for finance queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Year,
    Month,
}

impl From<&str> for Granularity {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "month" => Granularity::Month,
            _ => Granularity::Year,
        }
    }
}

/// Configuration for the policy store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Comment author label when posting anonymously
    pub anonymous_label: String,
    /// Comment author label when posting with attribution
    pub citizen_label: String,
    /// Initial sort order
    pub sort_order: SortOrder,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self {
            anonymous_label: "匿名市民".to_string(),
            citizen_label: "市民".to_string(),
            sort_order: SortOrder::Newest,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.anonymous_label.trim().is_empty() {
            return Err(Error::Config(
                "Anonymous author label must not be empty".to_string(),
            ));
        }
        if self.citizen_label.trim().is_empty() {
            return Err(Error::Config(
                "Citizen author label must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating store configurations
#[derive(Debug, Clone)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: StoreConfig::new(),
        }
    }

    /// Set the anonymous author label
    pub fn anonymous_label(mut self, label: impl Into<String>) -> Self {
        self.config.anonymous_label = label.into();
        self
    }

    /// Set the attributed author label
    pub fn citizen_label(mut self, label: impl Into<String>) -> Self {
        self.config.citizen_label = label.into();
        self
    }

    /// Set the initial sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.config.sort_order = order;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<StoreConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for StoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
