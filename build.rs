const COMMANDS: &[&str] = &["share", "share_to_target", "can_share"];

fn main() {
  tauri_plugin::Builder::new(COMMANDS).build();
}
