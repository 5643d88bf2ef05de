pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

pub const CONFIG_FILE_STEM: &str = "clinic-assist";

pub fn is_true(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
