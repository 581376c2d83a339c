/// XMODL Terminal Demo - Animated turntable
///
/// Loads the built-in demo model and renders it as ASCII art.
/// Controls:
///   - WASD / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - Q/ESC: Quit

use anyhow::Context;
use xmodl_core::{NoTextures, SceneModel};
use xmodl_terminal::{demo, TerminalApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("XMODL Terminal Viewer - Loading...");

    let mut model = SceneModel::new();
    model
        .load_from(&demo::scene(), &mut NoTextures)
        .context("loading demo model")?;
    log::info!(
        "Demo model: {} bones, {} meshes",
        model.bones().len(),
        model.meshes().len()
    );

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(model)?.animate_bone(demo::SPINNER_BONE);
    app.run()?;

    println!("Thank you for using XMODL Terminal Viewer!");
    Ok(())
}
