fn main() -> anyhow::Result<()> {
    strut::app::run()
}
