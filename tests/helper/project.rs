//! Project descriptor fixtures

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Descriptor as written by a Godot 4 editor
pub const GODOT_4_PROJECT: &str = r#"; Engine configuration file.
; It's best edited using the editor UI and not directly,
; since the parameters that go here are not all obvious.
;
; Format:
;   [section] ; section goes between []
;   param=value ; assign values to parameters

config_version=5

[application]

config/name="Dodge the Creeps"
config/description="A simple game where you dodge the creeps."
config/version="1.0.3"
config/tags=PackedStringArray("demo", "2d")
run/main_scene="res://main.tscn"
config/features=PackedStringArray("4.2", "GL Compatibility")
config/icon="res://icon.webp"

[display]

window/size/viewport_width=480
window/size/viewport_height=720
window/stretch/mode="canvas_items"

[input]

move_left={
"deadzone": 0.5,
"events": [Object(InputEventKey,"resource_local_to_scene":false,"resource_name":"","device":-1,"window_id":0,"alt_pressed":false,"shift_pressed":false,"ctrl_pressed":false,"meta_pressed":false,"pressed":false,"keycode":0,"physical_keycode":4194319,"key_label":0,"unicode":0,"location":0,"echo":false,"script":null)
, Object(InputEventJoypadButton,"resource_local_to_scene":false,"resource_name":"","device":-1,"button_index":13,"pressure":0.0,"pressed":false,"script":null)
]
}

[rendering]

renderer/rendering_method="gl_compatibility"
environment/defaults/default_clear_color=Color(0.301961, 0.301961, 0.301961, 1)
"#;

/// Older descriptor layout: no feature tags, CRLF line endings, no final newline
pub const GODOT_3_PROJECT: &str = "; Engine configuration file.\r\n\r\nconfig_version=4\r\n\r\n[application]\r\n\r\nconfig/name=\"Legacy\"\r\nconfig/icon=\"res://icon.png\"\r\n\r\n[physics]\r\n\r\ncommon/enable_pause_aware_picking=true";

/// Write `text` as `project.godot` in a fresh temp directory
pub fn create_project(text: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("project.godot");
    fs::write(&path, text).unwrap();
    (dir, path)
}

/// Sorted file names in `dir`
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
