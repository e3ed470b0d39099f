use crate::scenarios;

pub fn exec() -> miette::Result<()> {
    for scenario in scenarios::all() {
        println!("{:<16} {}", scenario.name, scenario.description);
    }
    Ok(())
}
