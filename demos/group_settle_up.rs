//! A group trip settled up with as few transfers as the greedy pass finds.

use rust_decimal_macros::dec;
use settle_up::core::group::Group;
use settle_up::core::money::format_amount;
use settle_up::optimization::settlement::SettlementPlan;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("━━━ Ski trip ━━━\n");

    let mut group = Group::new("Ski trip", "maya")?;
    let maya = group.add_member("maya")?;
    let noah = group.add_member("noah")?;
    let omar = group.add_member("omar")?;
    let pia = group.add_member("pia")?;

    // Chalet paid by maya, lift passes by noah, dinner by omar
    for (from, to, amount) in [
        (&noah, &maya, dec!(210)),
        (&omar, &maya, dec!(210)),
        (&pia, &maya, dec!(210)),
        (&maya, &noah, dec!(64.50)),
        (&omar, &noah, dec!(64.50)),
        (&pia, &noah, dec!(64.50)),
        (&maya, &omar, dec!(37.25)),
        (&noah, &omar, dec!(37.25)),
        (&pia, &omar, dec!(37.25)),
    ] {
        group.add_debt(from, to, amount)?;
    }

    println!("Recorded debts: {}\n", group.debts().len());
    for (person, balance) in group.balances().iter() {
        println!("  {:<6} {:>10}", person.as_str(), format_amount(balance));
    }
    println!();

    let result = group.simplify();
    println!("{}", result);
    println!("{}", SettlementPlan::from_transfers(group.debts()));
    Ok(())
}
