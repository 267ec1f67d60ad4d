//! Money requests: ask, approve or reject, then settle.

use rust_decimal_macros::dec;
use settle_up::storage::group_store::GroupStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = GroupStore::new();
    let flat = store.create_group("Flat 2", "jo")?;

    let (rent, plant) = store.update(flat, |g| {
        let jo = g.add_member("jo")?;
        let kai = g.add_member("kai")?;
        let lu = g.add_member("lu")?;
        g.add_debt(&kai, &lu, dec!(18))?;
        let rent = g.request_money(&jo, &kai, dec!(600), Some("October rent".into()))?;
        let plant = g.request_money(&jo, &lu, dec!(12), Some("plant".into()))?;
        Ok((rent, plant))
    })?;

    store.update(flat, |g| g.approve_request(rent).map(|_| ()))?;
    store.update(flat, |g| g.reject_request(plant))?;

    let group = store.get(flat)?;
    for r in group.requests() {
        println!(
            "{} asks {} for {}: {}",
            r.from(),
            r.to(),
            r.amount(),
            r.status()
        );
    }
    println!();

    let result = store.simplify(flat)?;
    println!("{}", result);
    Ok(())
}
