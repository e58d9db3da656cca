fn main() -> anyhow::Result<()> {
    facedash_lib::run()
}
