use brume::BrumeApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let app = BrumeApp::new()?;
    app.run()
}
