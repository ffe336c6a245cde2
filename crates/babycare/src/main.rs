//! `babycare` - CLI for the babycare tracker
//!
//! This binary manages baby profiles, records feedings, sleep, diapers, and
//! growth, and prints ages and summaries from the local database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::{bail, Context};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};

use babycare::cli::input::{end_after, parse_date, resolve_time};
use babycare::cli::{
    AgeCommand, BabyCommand, Cli, Command, ConfigCommand, DiaperArgs, FeedingArgs, GrowthArgs,
    OutputFormat, ProfileDetails, RecordCommand, RecordTarget, RecordsCommand, SleepArgs,
    SummaryCommand,
};
use babycare::records::{Diaper, Feeding, Growth, RecordKind, Sleep, TIMESTAMP_FORMAT};
use babycare::storage::RecordFilter;
use babycare::summary::{week_start, DailySummary, WeeklySummary};
use babycare::{
    init_logging, AgeResult, BabyProfile, BabyStore, CareRecord, Config, Error, RecordEntry,
    Storage,
};

type Store = BabyStore<Storage>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);
    let loaded = Config::load_from(Some(config_path.clone()));

    if let Command::Config(cmd) = cli.command {
        return handle_config(loaded, &config_path, cmd);
    }

    let config = loaded
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    let mut store = open_store(&config)?;
    let now = Local::now().naive_local();
    let today = now.date();

    match cli.command {
        Command::Baby(cmd) => handle_baby(&mut store, cmd, today),
        Command::Age(cmd) => handle_age(&store, &cmd, today),
        Command::Record { target, command } => handle_record(&mut store, &target, command, now),
        Command::Records(cmd) => handle_records(&store, &config, cmd, today),
        Command::Summary(cmd) => handle_summary(&store, &config, cmd, today),
        Command::Status(cmd) => handle_status(&store, &config, &config_path, cmd.json),
        Command::Config(_) => Ok(()),
    }
}

/// Open the database and restore the persisted current-baby selection.
fn open_store(config: &Config) -> anyhow::Result<Store> {
    let db_path = config.database_path();
    let storage = Storage::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    let persisted = storage.current_baby_id()?;
    let mut store = BabyStore::load(storage)?;
    if let Some(id) = persisted {
        if store.select(id).is_err() {
            warn!("Persisted current baby {} no longer exists", id);
        }
    }
    debug!(
        "Current baby: {:?}",
        store.current().map(|b| b.nickname.as_str())
    );
    Ok(store)
}

fn persist_selection(store: &Store) -> babycare::Result<()> {
    store
        .repository()
        .set_current_baby_id(store.current().map(|b| b.id))
}

fn resolve_baby<'a>(store: &'a Store, key: Option<&str>) -> babycare::Result<&'a BabyProfile> {
    match key {
        Some(key) => store.find(key),
        None => store.current().ok_or(Error::NoBabySelected),
    }
}

fn apply_details(baby: &mut BabyProfile, details: &ProfileDetails) {
    if let Some(weeks) = details.weeks {
        baby.gestational_weeks = Some(weeks);
    }
    if let Some(days) = details.days {
        baby.gestational_days = Some(days);
    }
    if let Some(height) = details.height {
        baby.height_cm = Some(height);
    }
    if let Some(weight) = details.weight {
        baby.weight_kg = Some(weight);
    }
    if let Some(head) = details.head {
        baby.head_circumference_cm = Some(head);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_minutes(minutes: i64) -> String {
    format!("{}h{:02}m", minutes / 60, minutes % 60)
}

// === Babies ===

#[derive(Serialize)]
struct ProfileView<'a> {
    #[serde(flatten)]
    profile: &'a BabyProfile,
    current: bool,
    day_of_life: i64,
    age: AgeResult,
    gestational_age: Option<String>,
}

fn handle_baby(store: &mut Store, cmd: BabyCommand, today: NaiveDate) -> anyhow::Result<()> {
    match cmd {
        BabyCommand::Add(args) => {
            let birth = parse_date(&args.birth, today)?;
            let mut baby = BabyProfile::new(args.nickname, birth, args.gender.into());
            apply_details(&mut baby, &args.details);

            let id = store.add(baby, today)?;
            persist_selection(store)?;
            if !store.repository().is_onboarded()? {
                store.repository().set_onboarded()?;
            }

            if let Some(baby) = store.get(id) {
                println!(
                    "Added {} (id {}), age {}",
                    baby.nickname,
                    id,
                    baby.age_on(today).display_text
                );
            }
        }
        BabyCommand::List { json } => {
            let current = store.current().map(|b| b.id);
            if json {
                let views: Vec<ProfileView<'_>> = store
                    .babies()
                    .iter()
                    .map(|b| profile_view(b, current, today))
                    .collect();
                return print_json(&views);
            }
            if store.is_empty() {
                println!("No babies yet. Add one with `babycare baby add`.");
                return Ok(());
            }
            for baby in store.babies() {
                let marker = if current == Some(baby.id) { "*" } else { " " };
                println!(
                    "{marker} {:>3}  {}  {}  {}  {}",
                    baby.id,
                    baby.nickname,
                    baby.birth_date,
                    baby.gender.display_name(),
                    baby.age_on(today).display_text
                );
            }
        }
        BabyCommand::Show { baby, json } => {
            let current = store.current().map(|b| b.id);
            let baby = resolve_baby(store, baby.as_deref())?;
            if json {
                return print_json(&profile_view(baby, current, today));
            }
            print_profile(baby, today);
        }
        BabyCommand::Use { baby } => {
            let id = store.find(&baby)?.id;
            let selected = store.select(id)?.nickname.clone();
            persist_selection(store)?;
            println!("Now tracking {selected}");
        }
        BabyCommand::Update(args) => {
            let mut baby = store.find(&args.baby)?.clone();
            if let Some(nickname) = args.nickname {
                baby.nickname = nickname;
            }
            if let Some(birth) = args.birth.as_deref() {
                baby.birth_date = parse_date(birth, today)?;
            }
            if let Some(gender) = args.gender {
                baby.gender = gender.into();
            }
            apply_details(&mut baby, &args.details);

            let nickname = baby.nickname.clone();
            store.update(baby, today)?;
            println!("Updated {nickname}");
        }
        BabyCommand::Remove { baby, yes } => {
            let (id, nickname) = {
                let baby = store.find(&baby)?;
                (baby.id, baby.nickname.clone())
            };
            if !yes {
                bail!("removing {nickname} also deletes all of their records; pass --yes to confirm");
            }

            // Records first: the id can be reused once the profile is gone.
            let deleted = store.repository().delete_records_for_baby(id)?;
            store.remove(id)?;
            persist_selection(store)?;
            println!("Removed {nickname} and {deleted} records");
        }
    }
    Ok(())
}

fn profile_view(baby: &BabyProfile, current: Option<i64>, today: NaiveDate) -> ProfileView<'_> {
    ProfileView {
        profile: baby,
        current: current == Some(baby.id),
        day_of_life: baby.day_of_life(today),
        age: baby.age_on(today),
        gestational_age: baby.gestational_age_text(),
    }
}

fn print_profile(baby: &BabyProfile, today: NaiveDate) {
    let age = baby.age_on(today);
    println!("{} ({})", baby.nickname, baby.gender.display_name());
    println!("  Born:           {}", baby.birth_date);
    println!("  Day of life:    {}", baby.day_of_life(today));
    println!("  Age:            {}", age.display_text);
    if let Some(corrected) = &age.corrected_display_text {
        println!("  Corrected age:  {corrected}");
    }
    if let Some(gestation) = baby.gestational_age_text() {
        println!("  Gestation:      {gestation}");
    }
    if let Some(height) = baby.height_cm {
        println!("  Height:         {height:.1} cm");
    }
    if let Some(weight) = baby.weight_kg {
        println!("  Weight:         {weight:.2} kg");
    }
    if let Some(head) = baby.head_circumference_cm {
        println!("  Head:           {head:.1} cm");
    }
}

// === Age ===

#[derive(Serialize)]
struct AgeView<'a> {
    nickname: &'a str,
    on: NaiveDate,
    day_of_life: i64,
    premature: bool,
    #[serde(flatten)]
    age: AgeResult,
}

fn handle_age(store: &Store, cmd: &AgeCommand, today: NaiveDate) -> anyhow::Result<()> {
    let baby = resolve_baby(store, cmd.baby.as_deref())?;
    let on = match cmd.on.as_deref() {
        Some(date) => parse_date(date, today)?,
        None => today,
    };
    let age = baby.age_on(on);

    if cmd.json {
        return print_json(&AgeView {
            nickname: &baby.nickname,
            on,
            day_of_life: baby.day_of_life(on),
            premature: baby.is_premature(),
            age,
        });
    }

    println!("{}: {}", baby.nickname, age.display_text);
    if let Some(corrected) = &age.corrected_display_text {
        println!("Corrected age: {corrected}");
    }
    if let Some(gestation) = baby.gestational_age_text() {
        println!("Born at {gestation}");
    }
    Ok(())
}

// === Records ===

fn handle_record(
    store: &mut Store,
    target: &RecordTarget,
    command: RecordCommand,
    now: NaiveDateTime,
) -> anyhow::Result<()> {
    let baby_id = resolve_baby(store, target.baby.as_deref())?.id;
    let at = resolve_time(target.at.as_deref(), now)?;

    let entry = match command {
        RecordCommand::Feeding(args) => RecordEntry::Feeding(build_feeding(args, at)?),
        RecordCommand::Sleep(args) => RecordEntry::Sleep(build_sleep(&args, at)?),
        RecordCommand::Diaper(args) => RecordEntry::Diaper(build_diaper(&args)),
        RecordCommand::Growth(args) => RecordEntry::Growth(build_growth(&args)),
    };
    let record = CareRecord::new(baby_id, at, entry).with_notes(target.notes.clone());
    let id = store.repository().insert_record(&record)?;

    if let RecordEntry::Growth(growth) = &record.entry {
        update_profile_growth(store, baby_id, id, growth, now.date())?;
    }

    println!(
        "#{id} {}  {}",
        record.recorded_at.format("%Y-%m-%d %H:%M"),
        record.describe()
    );
    for warning in record.warnings() {
        println!("⚠ {warning}");
    }
    Ok(())
}

/// Copy a growth measurement onto the profile if it is the newest one.
fn update_profile_growth(
    store: &mut Store,
    baby_id: i64,
    record_id: i64,
    growth: &Growth,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let newest = store.repository().list_records(
        baby_id,
        &RecordFilter {
            kind: Some(RecordKind::Growth),
            limit: Some(1),
            ..RecordFilter::default()
        },
    )?;
    if newest.first().and_then(|r| r.id) != Some(record_id) {
        debug!("Growth record {} is not the newest; profile unchanged", record_id);
        return Ok(());
    }

    let mut baby = store
        .get(baby_id)
        .cloned()
        .ok_or_else(|| Error::baby_not_found(baby_id.to_string()))?;
    baby.apply_growth(growth);
    store.update(baby, today)?;
    Ok(())
}

fn build_feeding(args: FeedingArgs, at: NaiveDateTime) -> babycare::Result<Feeding> {
    let (start_time, end_time) = match args.duration.as_deref() {
        Some(duration) => (Some(at), Some(end_after(at, duration)?)),
        None => (None, None),
    };

    Ok(Feeding {
        feeding_type: args.feeding_type.into(),
        method: args.method.map(Into::into),
        food: args.food,
        amount: args.amount,
        unit: args.unit,
        start_time,
        end_time,
        acceptance: args.acceptance.into(),
        is_allergic: args.allergic,
    })
}

fn build_sleep(args: &SleepArgs, at: NaiveDateTime) -> babycare::Result<Sleep> {
    let end_time = match (args.end.as_deref(), args.duration.as_deref()) {
        (Some(end), _) => {
            let mut end_time = resolve_time(Some(end), at)?;
            // A bare HH:MM earlier than the start means the sleep crossed midnight.
            if end_time < at && !end.contains('-') {
                end_time += Duration::days(1);
            }
            Some(end_time)
        }
        (None, Some(duration)) => Some(end_after(at, duration)?),
        (None, None) => None,
    };

    Ok(Sleep {
        sleep_type: args.sleep_type.into(),
        end_time,
        quality: args.quality.map(Into::into),
        wake_count: args.wakes,
    })
}

fn build_diaper(args: &DiaperArgs) -> Diaper {
    Diaper {
        diaper_type: args.diaper_type.into(),
        pee_status: args.pee_status.map(Into::into),
        pee_color: args.pee_color.map(Into::into),
        poop_status: args.poop_status.map(Into::into),
        poop_color: args.poop_color.map(Into::into),
    }
}

fn build_growth(args: &GrowthArgs) -> Growth {
    Growth {
        weight_kg: args.weight,
        height_cm: args.height,
        head_circumference_cm: args.head,
    }
}

fn handle_records(
    store: &Store,
    config: &Config,
    cmd: RecordsCommand,
    today: NaiveDate,
) -> anyhow::Result<()> {
    match cmd {
        RecordsCommand::List {
            baby,
            kind,
            date,
            limit,
            format,
        } => {
            let baby = resolve_baby(store, baby.as_deref())?;
            let mut filter = match date.as_deref() {
                Some(date) => RecordFilter::on_day(parse_date(date, today)?),
                None => RecordFilter::default(),
            };
            filter.kind = kind.map(Into::into);
            filter.limit = Some(limit.unwrap_or(config.records.list_limit));

            let records = store.repository().list_records(baby.id, &filter)?;
            if format == OutputFormat::Json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No records for {}.", baby.nickname);
                return Ok(());
            }
            for record in &records {
                let notes = record
                    .notes
                    .as_deref()
                    .map(|n| format!("  ({n})"))
                    .unwrap_or_default();
                println!(
                    "#{:<5} {}  {:<7}  {}{}",
                    record.id.unwrap_or_default(),
                    record.recorded_at.format("%Y-%m-%d %H:%M"),
                    record.kind(),
                    record.describe(),
                    notes
                );
            }
        }
        RecordsCommand::Delete { id } => {
            if !store.repository().delete_record(id)? {
                return Err(Error::RecordNotFound { id }.into());
            }
            println!("Deleted record #{id}");
        }
    }
    Ok(())
}

// === Summaries ===

fn handle_summary(
    store: &Store,
    config: &Config,
    cmd: SummaryCommand,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let target_ml = config.feeding.daily_milk_target_ml;
    match cmd {
        SummaryCommand::Daily { baby, date, format } => {
            let baby = resolve_baby(store, baby.as_deref())?;
            let day = match date.as_deref() {
                Some(date) => parse_date(date, today)?,
                None => today,
            };
            let records = store
                .repository()
                .list_records(baby.id, &RecordFilter::on_day(day))?;
            let summary = DailySummary::from_records(day, &records);

            if format == OutputFormat::Json {
                return print_json(&summary);
            }
            println!("{} · {}", baby.nickname, summary.date);
            print_daily(&summary, target_ml);
        }
        SummaryCommand::Weekly {
            baby,
            week_of,
            format,
        } => {
            let baby = resolve_baby(store, baby.as_deref())?;
            let any_day = match week_of.as_deref() {
                Some(date) => parse_date(date, today)?,
                None => today,
            };
            let start = week_start(any_day).and_time(NaiveTime::MIN);
            let records = store
                .repository()
                .list_records(baby.id, &RecordFilter::between(start, start + Duration::days(7)))?;
            let summary = WeeklySummary::for_week(any_day, &records, target_ml);

            if format == OutputFormat::Json {
                return print_json(&summary);
            }
            println!("{} · {} to {}", baby.nickname, summary.week_start, summary.week_end());
            print_weekly(&summary);
        }
    }
    Ok(())
}

fn print_daily(summary: &DailySummary, target_ml: f64) {
    let target_mark = if summary.meets_milk_target(target_ml) {
        "reached"
    } else {
        "not reached"
    };
    println!(
        "  Milk:     {} feeds, {:.0} ml (target {:.0} ml {}), nursing {} min",
        summary.milk_count, summary.milk_volume_ml, target_ml, target_mark, summary.nursing_minutes
    );
    if summary.food_count > 0 {
        println!(
            "  Solids:   {} ({})",
            summary.food_count,
            summary.foods.join("、")
        );
    }
    println!(
        "  Sleep:    {} naps {}, night {}, woke {} times",
        summary.nap_count,
        format_minutes(summary.nap_minutes),
        format_minutes(summary.night_sleep_minutes),
        summary.night_wake_count
    );
    println!(
        "  Diapers:  {} (wet {}, dirty {})",
        summary.diaper_count, summary.wet_count, summary.dirty_count
    );
    if let Some(growth) = &summary.latest_growth {
        let mut parts = Vec::new();
        if let Some(w) = growth.weight_kg {
            parts.push(format!("{w:.2} kg"));
        }
        if let Some(h) = growth.height_cm {
            parts.push(format!("{h:.1} cm"));
        }
        if let Some(hc) = growth.head_circumference_cm {
            parts.push(format!("head {hc:.1} cm"));
        }
        println!("  Growth:   {}", parts.join(", "));
    }
    for alert in &summary.alerts {
        println!("  ⚠ {alert}");
    }
}

fn print_weekly(summary: &WeeklySummary) {
    println!("  Day        Milk(ml)  Solids  Sleep    Diapers");
    for day in &summary.days {
        println!(
            "  {}  {:>8.0}  {:>6}  {:>7}  {:>7}",
            day.date.format("%a %m-%d"),
            day.milk_volume_ml,
            day.food_count,
            format_minutes(day.total_sleep_minutes()),
            day.diaper_count
        );
    }
    println!();
    println!(
        "  Totals:   milk {:.0} ml, solids {}, sleep {}, night wakes {}",
        summary.total_milk_ml,
        summary.total_food_count,
        format_minutes(summary.total_sleep_minutes),
        summary.total_night_wakes
    );
    if summary.recorded_days > 0 {
        println!(
            "  Averages: milk {:.0} ml/day, sleep {:.0} min/day over {} recorded days",
            summary.avg_milk_ml, summary.avg_sleep_minutes, summary.recorded_days
        );
    }
    println!(
        "  Milk target of {:.0} ml met on {} days",
        summary.milk_target_ml, summary.milk_target_met_days
    );
}

// === Status and configuration ===

fn handle_status(
    store: &Store,
    config: &Config,
    config_path: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let storage = store.repository();
    let stats = storage.stats()?;
    let current = store.current().map(|b| b.nickname.as_str());
    let onboarded = storage.is_onboarded()?;

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "config_path": config_path,
            "onboarded": onboarded,
            "babies": stats.babies,
            "current_baby": current,
            "total_records": stats.total_records,
            "records_by_kind": stats.records_by_kind,
            "oldest_record": stats.oldest_record.map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            "newest_record": stats.newest_record.map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            "db_size_bytes": stats.db_size_bytes,
            "daily_milk_target_ml": config.feeding.daily_milk_target_ml,
        });
        return print_json(&status);
    }

    println!("babycare status");
    println!("---------------");
    println!("Database:      {}", storage.path().display());
    println!("Config:        {}", config_path.display());
    println!("Babies:        {}", stats.babies);
    println!("Current baby:  {}", current.unwrap_or("(none)"));
    println!("Records:       {}", stats.total_records);
    for (kind, count) in &stats.records_by_kind {
        println!("  {kind:<10}   {count}");
    }
    if let (Some(oldest), Some(newest)) = (stats.oldest_record, stats.newest_record) {
        println!(
            "Range:         {} to {}",
            oldest.format("%Y-%m-%d %H:%M"),
            newest.format("%Y-%m-%d %H:%M")
        );
    }
    println!("Size:          {} bytes", stats.db_size_bytes);
    Ok(())
}

fn handle_config(
    loaded: babycare::Result<Config>,
    config_path: &Path,
    cmd: ConfigCommand,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = loaded.context("failed to load configuration")?;
            if json {
                return print_json(&config);
            }
            println!("# {}", config_path.display());
            println!("# effective database path: {}", config.database_path().display());
            print!("{}", config.to_toml()?);
        }
        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }
        ConfigCommand::Validate { file } => {
            let (path, result) = match file {
                Some(file) => {
                    let result = Config::load_from(Some(file.clone()));
                    (file, result)
                }
                None => (config_path.to_path_buf(), loaded),
            };
            println!("Validating configuration: {}", path.display());
            result.with_context(|| format!("{} is not valid", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
