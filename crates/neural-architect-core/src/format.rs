/// Render whole seconds as `MM:SS`. Minutes are not wrapped at the hour.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
