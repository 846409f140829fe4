/// GNOME and most GTK desktops expose the preference through gsettings.
pub fn is_dark_mode() -> bool {
    let query = |key: &str| {
        std::process::Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", key])
            .output()
            .ok()
            .map(|o| String::from_utf8_lossy(&o.stdout).to_ascii_lowercase())
    };

    if let Some(scheme) = query("color-scheme") {
        if scheme.contains("prefer-dark") {
            return true;
        }
    }
    query("gtk-theme").is_some_and(|theme| theme.contains("dark"))
}
