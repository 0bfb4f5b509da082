//! Interactive six-stage wizard over a [`Prompter`].
//!
//! Every stage reads its answers, submits them to the [`Wizard`] and tries to
//! advance. Rejected answers are reported and the stage is asked again. End
//! of input anywhere abandons the session.

use std::io::{BufRead, Write};

use tracing::warn;

use estimate_core::calculations::geometry::{BuildingKind, GeometryInput, ZoneSelection};
use estimate_core::file_io::EstimateReport;
use estimate_core::materials::{ConditionRating, SupportMaterial};
use estimate_core::options::{DoorType, OptionsBag};
use estimate_core::pdf::render_estimate_pdf;
use estimate_core::services::{
    building_context, deliver_estimate, search_addresses, street_imagery, AddressResolver, ContactInfo,
    ContextProvider, Coordinates, DeliveryRequest, DeliveryService, ImageryProvider, MIN_QUERY_CHARS,
};
use estimate_core::session::{FacadeCondition, SelectedAddress};
use estimate_core::wizard::{Stage, Wizard};
use estimate_core::EstimateResult;

use crate::prompt::Prompter;
use crate::render::write_estimate;
use crate::CliError;

/// Paris city hall, offered when coordinates are typed in by hand
const DEFAULT_LATITUDE: f64 = 48.8566;
const DEFAULT_LONGITUDE: f64 = 2.3522;

const DEFAULT_LEAD_TIME_MONTHS: u32 = 3;

/// Remote collaborators the wizard talks to. Without a resolver the address
/// is typed in with its coordinates.
pub struct Collaborators {
    pub resolver: Option<Box<dyn AddressResolver>>,
    pub context: Box<dyn ContextProvider>,
    pub imagery: Box<dyn ImageryProvider>,
    pub delivery: Box<dyn DeliveryService>,
}

enum Flow {
    Continue,
    Quit,
}

/// Unwrap a prompt answer, abandoning the session at end of input
macro_rules! ask {
    ($answer:expr) => {
        match $answer? {
            Some(value) => value,
            None => return Ok(Flow::Quit),
        }
    };
}

pub fn run<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    wizard: &mut Wizard,
    services: &Collaborators,
) -> Result<(), CliError> {
    writeln!(p.out(), "Ravel - indicative façade renovation estimate")?;

    loop {
        let stage = wizard.stage();
        writeln!(p.out())?;
        writeln!(p.out(), "── Step {}/{}: {} ──", stage.number(), Stage::ALL.len(), stage)?;

        let flow = match stage {
            Stage::AddressSelection => address_stage(p, wizard, services)?,
            Stage::DimensionCapture => dimension_stage(p, wizard)?,
            Stage::ConditionCapture => condition_stage(p, wizard)?,
            Stage::OptionCapture => option_stage(p, wizard)?,
            Stage::ContactCapture => contact_stage(p, wizard)?,
            Stage::ResultDelivery => result_stage(p, wizard, services)?,
        };

        if let Flow::Quit = flow {
            writeln!(p.out(), "Session closed.")?;
            return Ok(());
        }
    }
}

/// Stage menu shown before the questions: carry on, step back or quit.
fn navigate<R: BufRead, W: Write>(p: &mut Prompter<R, W>, wizard: &mut Wizard) -> Result<Option<Flow>, CliError> {
    let Some(answer) = p.line("Enter = continue, b = back, q = quit: ")? else {
        return Ok(Some(Flow::Quit));
    };
    match answer.to_lowercase().as_str() {
        "b" | "back" => {
            wizard.back();
            Ok(Some(Flow::Continue))
        }
        "q" | "quit" => Ok(Some(Flow::Quit)),
        _ => Ok(None),
    }
}

/// Submit the stage's answers and advance, reporting a rejection instead of
/// failing the session.
fn submit_and_advance<W: Write>(
    out: &mut W,
    wizard: &mut Wizard,
    submit: impl FnOnce(&mut Wizard) -> EstimateResult<()>,
) -> Result<Flow, CliError> {
    if let Err(e) = submit(wizard).and_then(|_| wizard.advance()) {
        writeln!(out, "  {}", e)?;
    }
    Ok(Flow::Continue)
}

fn address_stage<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    wizard: &mut Wizard,
    services: &Collaborators,
) -> Result<Flow, CliError> {
    let current = wizard.session().address().cloned();
    let prompt = match &current {
        Some(address) => format!("Address [{}] (q = quit): ", address.label),
        None => "Address (q = quit): ".to_string(),
    };

    let query = ask!(p.line(&prompt));
    if query.eq_ignore_ascii_case("q") {
        return Ok(Flow::Quit);
    }

    let selected = match (query.is_empty(), current) {
        (true, Some(current)) => current,
        _ if query.chars().count() < MIN_QUERY_CHARS => {
            writeln!(p.out(), "  Please type at least {} characters.", MIN_QUERY_CHARS)?;
            return Ok(Flow::Continue);
        }
        _ => match &services.resolver {
            Some(resolver) => {
                let candidates = search_addresses(resolver.as_ref(), &query);
                if candidates.is_empty() {
                    writeln!(p.out(), "  No matching address, try another spelling.")?;
                    return Ok(Flow::Continue);
                }
                let labels: Vec<String> = candidates.iter().map(|c| c.label.clone()).collect();
                let index = ask!(p.choose("Matching addresses:", &labels, 0));
                let chosen = &candidates[index];
                SelectedAddress {
                    label: chosen.label.clone(),
                    coordinates: chosen.coordinates,
                }
            }
            None => {
                let latitude = ask!(p.f64("Latitude", DEFAULT_LATITUDE));
                let longitude = ask!(p.f64("Longitude", DEFAULT_LONGITUDE));
                SelectedAddress {
                    label: query,
                    coordinates: Coordinates::new(latitude, longitude),
                }
            }
        },
    };

    if let Err(e) = selected.coordinates.validate() {
        writeln!(p.out(), "  {}", e)?;
        return Ok(Flow::Continue);
    }

    let context = building_context(services.context.as_ref(), selected.coordinates);
    let imagery = street_imagery(services.imagery.as_ref(), selected.coordinates, None);

    if let Some(levels) = context.level_count_hint {
        writeln!(p.out(), "  Map data suggests {} levels.", levels)?;
    }
    if context.has_ground_floor_retail == Some(true) {
        writeln!(p.out(), "  A shop seems to occupy the ground floor.")?;
    }
    let note = if imagery.is_fallback { " (generic picture)" } else { "" };
    writeln!(p.out(), "  Street view: {}{}", imagery.url, note)?;

    submit_and_advance(p.out(), wizard, |w| w.submit_address(selected, context, Some(imagery)))
}

fn dimension_stage<R: BufRead, W: Write>(p: &mut Prompter<R, W>, wizard: &mut Wizard) -> Result<Flow, CliError> {
    if let Some(flow) = navigate(p, wizard)? {
        return Ok(flow);
    }
    let suggested = wizard.suggested_dimensions();

    let kinds = vec![
        "Attached (party walls on both sides)".to_string(),
        "Detached".to_string(),
    ];
    let kind_default = match suggested.kind {
        BuildingKind::Attached => 0,
        BuildingKind::Detached => 1,
    };
    let kind = match ask!(p.choose("Building type:", &kinds, kind_default)) {
        0 => BuildingKind::Attached,
        _ => BuildingKind::Detached,
    };

    let level_count = ask!(p.u32("Number of levels", suggested.level_count.max(1) as u32));
    let level_height_m = ask!(p.f64("Height of one level (m)", suggested.level_height_m));
    let street_width_m = ask!(p.f64("Street frontage width (m)", suggested.street_width_m));

    let zones_list = vec![
        "Street façade".to_string(),
        "Rear façade".to_string(),
        "Both".to_string(),
    ];
    let zones_default = match suggested.zones {
        ZoneSelection::Street => 0,
        ZoneSelection::Rear => 1,
        ZoneSelection::Both => 2,
    };
    let zones = match ask!(p.choose("Façades to treat:", &zones_list, zones_default)) {
        0 => ZoneSelection::Street,
        1 => ZoneSelection::Rear,
        _ => ZoneSelection::Both,
    };

    let rear_width_m = if zones == ZoneSelection::Street {
        suggested.rear_width_m
    } else {
        let default = suggested.rear_width_m.unwrap_or(street_width_m);
        Some(ask!(p.f64("Rear frontage width (m)", default)))
    };

    let all_faces = kind == BuildingKind::Detached && zones == ZoneSelection::Both;
    let treat_side_wall = if all_faces {
        false
    } else {
        ask!(p.yes_no("Also treat a side wall?", suggested.treat_side_wall))
    };

    let depth_m = if treat_side_wall || all_faces {
        let default = suggested.depth_m.unwrap_or(street_width_m);
        Some(ask!(p.f64("Building depth (m)", default)))
    } else {
        suggested.depth_m
    };

    let level_count = i32::try_from(level_count).unwrap_or(i32::MAX);
    let dimensions = GeometryInput {
        kind,
        level_count,
        level_height_m,
        street_width_m,
        rear_width_m,
        depth_m,
        treat_side_wall,
        zones,
        width_floor_m: suggested.width_floor_m,
    };
    submit_and_advance(p.out(), wizard, |w| w.submit_dimensions(dimensions))
}

fn condition_stage<R: BufRead, W: Write>(p: &mut Prompter<R, W>, wizard: &mut Wizard) -> Result<Flow, CliError> {
    if let Some(flow) = navigate(p, wizard)? {
        return Ok(flow);
    }
    let current = wizard.session().facade().copied();

    let supports: Vec<String> = SupportMaterial::ALL.iter().map(|s| s.display_name().to_string()).collect();
    let support_default = current
        .and_then(|f| SupportMaterial::ALL.iter().position(|s| *s == f.support))
        .unwrap_or(0);
    let support = SupportMaterial::ALL[ask!(p.choose("Façade support:", &supports, support_default))];

    let conditions: Vec<String> = ConditionRating::ALL.iter().map(|c| c.display_name().to_string()).collect();
    let condition_default = ConditionRating::ALL
        .iter()
        .position(|c| *c == current.map(|f| f.condition).unwrap_or_default())
        .unwrap_or(0);
    let condition = ConditionRating::ALL[ask!(p.choose("General condition:", &conditions, condition_default))];

    submit_and_advance(p.out(), wizard, |w| w.submit_condition(FacadeCondition { support, condition }))
}

fn option_stage<R: BufRead, W: Write>(p: &mut Prompter<R, W>, wizard: &mut Wizard) -> Result<Flow, CliError> {
    if let Some(flow) = navigate(p, wizard)? {
        return Ok(flow);
    }
    let s = wizard.suggested_options();

    writeln!(p.out(), "Openings")?;
    let small_windows = ask!(p.u32("  Small windows", s.small_windows));
    let large_windows = ask!(p.u32("  French windows", s.large_windows));
    let door = {
        let doors = vec![
            "No door to repaint".to_string(),
            "Entry door".to_string(),
            "Carriage door".to_string(),
        ];
        let default = match s.door {
            DoorType::None => 0,
            DoorType::EntryDoor => 1,
            DoorType::CarriageDoor => 2,
        };
        match ask!(p.choose("  Street door:", &doors, default)) {
            0 => DoorType::None,
            1 => DoorType::EntryDoor,
            _ => DoorType::CarriageDoor,
        }
    };

    writeln!(p.out(), "Metalwork")?;
    let railing_length_m = ask!(p.f64("  Window railings (m)", s.railing_length_m));
    let balcony_railing_length_m = ask!(p.f64("  Balcony railings (m)", s.balcony_railing_length_m));
    let galvanized_guard_length_m = ask!(p.f64("  Galvanised guards (m)", s.galvanized_guard_length_m));
    let downpipe_length_m = ask!(p.f64("  Downpipes (m)", s.downpipe_length_m));
    let band_course_length_m = ask!(p.f64("  Band courses and cornices (m)", s.band_course_length_m));
    let flashing_length_m = ask!(p.f64("  Zinc flashing (m)", s.flashing_length_m));
    let vent_grille_count = ask!(p.u32("  Vent grilles", s.vent_grille_count));

    writeln!(p.out(), "Roof")?;
    let dormer_count = ask!(p.u32("  Dormers", s.dormer_count));
    let treat_dormers = if dormer_count > 0 {
        let default = if s.dormer_count == 0 { true } else { s.treat_dormers };
        ask!(p.yes_no("  Treat the dormers too?", default))
    } else {
        false
    };

    writeln!(p.out(), "Street")?;
    let has_retail = ask!(p.yes_no("  Shop on the ground floor?", s.has_retail));
    let retail_frontage_m = if has_retail {
        ask!(p.f64("  Shop frontage to protect (m)", s.retail_frontage_m))
    } else {
        0.0
    };
    let protection_mesh_length_m = ask!(p.f64("  Protection mesh (m)", s.protection_mesh_length_m));
    let period_style = ask!(p.yes_no("  Period (Haussmann) building?", s.period_style));

    writeln!(p.out(), "Damage seen on site (0 if unknown)")?;
    let detected_heavy_repair_m2 = ask!(p.f64("  Render to rebuild (m²)", s.detected_heavy_repair_m2));
    let detected_patch_repair_m2 = ask!(p.f64("  Render to patch (m²)", s.detected_patch_repair_m2));
    let hairline_crack_length_m = ask!(p.f64("  Hairline cracks (m)", s.hairline_crack_length_m));
    let open_crack_length_m = ask!(p.f64("  Open cracks (m)", s.open_crack_length_m));

    let options = OptionsBag {
        small_windows,
        large_windows,
        railing_length_m,
        balcony_railing_length_m,
        galvanized_guard_length_m,
        dormer_count,
        treat_dormers,
        downpipe_length_m,
        band_course_length_m,
        flashing_length_m,
        vent_grille_count,
        protection_mesh_length_m,
        has_retail,
        retail_frontage_m,
        door,
        period_style,
        detected_heavy_repair_m2,
        detected_patch_repair_m2,
        hairline_crack_length_m,
        open_crack_length_m,
    };
    submit_and_advance(p.out(), wizard, |w| w.submit_options(options))
}

fn contact_stage<R: BufRead, W: Write>(p: &mut Prompter<R, W>, wizard: &mut Wizard) -> Result<Flow, CliError> {
    if let Some(flow) = navigate(p, wizard)? {
        return Ok(flow);
    }
    let current = wizard.session().contact().cloned().unwrap_or_default();

    let name = ask!(p.text("Name", &current.name));
    let email = ask!(p.text("E-mail", &current.email));
    let phone = ask!(p.line("Phone (optional): "));
    let note = ask!(p.line("Anything we should know (optional): "));
    let lead_time = ask!(p.u32(
        "Desired start, in months",
        current.lead_time_months.unwrap_or(DEFAULT_LEAD_TIME_MONTHS)
    ));
    let urgent = ask!(p.yes_no("Urgent?", current.urgent));

    let optional = |s: String| Some(s).filter(|s| !s.is_empty());
    let contact = ContactInfo {
        name,
        email,
        phone: optional(phone).or(current.phone),
        note: optional(note).or(current.note),
        lead_time_months: Some(lead_time),
        urgent,
    };
    submit_and_advance(p.out(), wizard, |w| w.submit_contact(contact))
}

fn result_stage<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    wizard: &mut Wizard,
    services: &Collaborators,
) -> Result<Flow, CliError> {
    let report = EstimateReport::from_wizard(wizard)?;
    write_estimate(p.out(), &report)?;

    let contact = wizard.session().contact().cloned();
    match contact {
        Some(contact) if wizard.needs_delivery() => {
            let document = match render_estimate_pdf(&report) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(error = %e, "Could not render the estimate PDF, delivering without it");
                    None
                }
            };
            let request = DeliveryRequest::new(contact, report.address_label(), report.result.clone(), document);
            let outcome = deliver_estimate(services.delivery.as_ref(), &request);
            writeln!(p.out())?;
            match outcome.warning {
                Some(warning) => writeln!(p.out(), "  {}", warning)?,
                None => {
                    wizard.mark_delivered()?;
                    writeln!(p.out(), "  A copy was sent to {}.", request.recipient.email)?;
                }
            }
        }
        Some(contact) => {
            writeln!(p.out())?;
            writeln!(p.out(), "  This estimate was already sent to {}.", contact.email)?;
        }
        None => {}
    }

    let answer = ask!(p.line("s = start over, b = back, q = quit [q]: "));
    match answer.to_lowercase().as_str() {
        "s" => {
            wizard.start_over()?;
            Ok(Flow::Continue)
        }
        "b" => {
            wizard.back();
            Ok(Flow::Continue)
        }
        _ => Ok(Flow::Quit),
    }
}
