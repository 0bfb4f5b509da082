//! Plain-text rendering of estimates and rate tables.

use std::io::{self, Write};

use estimate_core::file_io::EstimateReport;
use estimate_core::materials::{ConditionRating, SupportMaterial};
use estimate_core::rates::{CleanupPolicy, RateTable};
use estimate_core::units::Money;

pub fn write_estimate<W: Write>(w: &mut W, report: &EstimateReport) -> io::Result<()> {
    let result = &report.result;
    let g = &report.geometry;

    writeln!(w, "═══════════════════════════════════════════════════════════════════════")?;
    writeln!(w, "  FAÇADE ESTIMATE  {}", report.address_label())?;
    writeln!(w, "═══════════════════════════════════════════════════════════════════════")?;
    writeln!(
        w,
        "  Height {:.2} m   Perimeter {:.2} m   Surface {:.2} m²   Faces {}",
        g.height_m, g.treated_perimeter_m, g.treated_surface_m2, g.face_count
    )?;
    writeln!(
        w,
        "  {} / {}  ->  {} finish at {} per m²",
        result.support.display_name(),
        result.condition.display_name(),
        result.finish,
        result.surface_unit_price.display_fr()
    )?;
    writeln!(w)?;

    for (family, subtotal) in result.family_subtotals() {
        writeln!(w, "  {}", family.display_name().to_uppercase())?;
        for line in result.lines.iter().filter(|l| l.family == family) {
            writeln!(
                w,
                "    {:<34} {:>9.2} {:<7} {:>13} {:>15}",
                line.description,
                line.quantity,
                line.unit.symbol(),
                line.unit_price.display_fr(),
                line.amount.display_fr()
            )?;
        }
        writeln!(w, "    {:>81}", format!("subtotal {}", subtotal.display_fr()))?;
    }

    writeln!(w)?;
    writeln!(w, "  Total excl. tax {:>20}", result.total.display_fr())?;
    writeln!(w, "  VAT             {:>20}", result.vat.display_fr())?;
    writeln!(w, "  Total incl. tax {:>20}", result.total_incl_tax.display_fr())?;
    writeln!(w)?;
    writeln!(w, "  Indicative figures (rates {}), not a quotation.", result.rates_version)?;
    Ok(())
}

pub fn write_rates<W: Write>(w: &mut W, rates: &RateTable) -> io::Result<()> {
    writeln!(w, "Rate table {} ({})", rates.version, rates.label)?;
    writeln!(w)?;
    writeln!(w, "Coefficients")?;
    writeln!(w, "  regional       {:.2}", rates.coefficients.regional)?;
    writeln!(w, "  period style   {:.2}", rates.coefficients.period_style)?;
    for condition in ConditionRating::ALL {
        writeln!(
            w,
            "  {:<14} {:.2}",
            condition.display_name().to_lowercase(),
            rates.coefficients.condition.get(condition)
        )?;
    }
    writeln!(w)?;

    writeln!(w, "Surface price per m² (finish)")?;
    write!(w, "  {:<20}", "")?;
    for condition in ConditionRating::ALL {
        write!(w, " {:>22}", condition.display_name())?;
    }
    writeln!(w)?;
    for support in SupportMaterial::ALL {
        write!(w, "  {:<20}", support.display_name())?;
        for condition in ConditionRating::ALL {
            let (finish, price) = rates.surface_unit_price(support, condition, false);
            write!(w, " {:>22}", format!("{} ({})", Money::from_major(price).display_fr(), finish))?;
        }
        writeln!(w)?;
    }
    writeln!(w)?;

    let cleanup = match rates.cleanup {
        CleanupPolicy::Proportional { rate } => format!("{:.1} % of subtotal", rate * 100.0),
        CleanupPolicy::LumpSum { amount } => Money::from_major(amount).display_fr(),
    };
    writeln!(w, "Cleanup        {}", cleanup)?;
    writeln!(w, "VAT            {:.1} %", rates.vat_rate * 100.0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimate_core::rates::canonical_rates;

    #[test]
    fn test_rates_table_lists_every_support() {
        let mut out = Vec::new();
        write_rates(&mut out, &canonical_rates()).unwrap();
        let text = String::from_utf8(out).unwrap();
        for support in SupportMaterial::ALL {
            assert!(text.contains(support.display_name()));
        }
        assert!(text.contains("1.0 % of subtotal"));
        assert!(text.contains("91,20 € (D3)"));
    }
}
