use crate::model::{PetState, Rules, Stat, Stats, STAGES};
use crate::sim::Action;
use crossterm::style::Stylize;
use std::fmt::Write as _;

const BAR_LEN: usize = 20;

pub fn stat_bar(value: f32, color: bool) -> String {
    let filled = ((value / 100.0) * BAR_LEN as f32).clamp(0.0, BAR_LEN as f32) as usize;
    let bar = format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_LEN - filled));
    let (dot, bar) = if value > 70.0 {
        ("🟢", if color { bar.green().to_string() } else { bar })
    } else if value > 30.0 {
        ("🟡", if color { bar.yellow().to_string() } else { bar })
    } else {
        ("🔴", if color { bar.red().to_string() } else { bar })
    };
    format!("{dot} {bar} {value:.0}%")
}

pub fn change_indicator(current: f32, previous: f32) -> String {
    let diff = current - previous;
    if diff.abs() < 1.0 {
        "─".to_string()
    } else if diff > 0.0 {
        format!("↑{diff:+.1}")
    } else {
        format!("↓{diff:.1}")
    }
}

pub fn time_alive(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

fn stat_label(stat: Stat) -> &'static str {
    match stat {
        Stat::Hunger => "Hunger:   ",
        Stat::Happiness => "Happiness:",
        Stat::Health => "Health:   ",
    }
}

pub fn banner() -> &'static str {
    "\
╔══════════════════════════════════════════════╗
║           ✨ SPIRIT HATCH ✨                 ║
║      Raise Your Mystical Spirit Animal       ║
╚══════════════════════════════════════════════╝"
}

fn decay_blurb(rules: &Rules) -> String {
    format!(
        "-{:.0} every 10 seconds",
        rules.decay_per_sec * 10.0
    )
}

pub fn welcome(name: &str, rules: &Rules) -> String {
    format!(
        "✨ {name} has been born! ✨\n\n\
         Your journey begins with a mysterious egg... 🥚\n\n\
         ⚠️  Stats decay over time:\n   • Hunger: {decay}\n   • Happiness: {decay}\n\n\
         ⏰ {day}s of real time = 1 game day\n\n\
         Tip: check on {name} regularly to keep stats healthy!",
        decay = decay_blurb(rules),
        day = rules.day_length_secs,
    )
}

pub fn help(rules: &Rules) -> String {
    let mut out = String::from("Commands:\n");
    let lines: [(&str, &str); 7] = [
        ("feed", "Feed your spirit animal 🍖"),
        ("play", "Play with your spirit animal 🎮"),
        ("rest", "Let your spirit rest 😴"),
        ("status", "View detailed stats 📊"),
        ("evolve", "Evolve to the next stage ✨"),
        ("help", "Show this help 📖"),
        ("quit", "Exit the game 👋"),
    ];
    for (cmd, what) in lines {
        let _ = writeln!(out, "  {cmd:<9}- {what}");
    }
    let extra: Vec<&str> = [Action::Train, Action::Explore, Action::Meditate, Action::Groom]
        .iter()
        .map(|a| a.as_str())
        .collect();
    let _ = writeln!(out, "  also: {}", extra.join(", "));

    let _ = write!(
        out,
        "\nHunger and happiness drop {}; health suffers while either is below {:.0}.\n\
         {}s of real time = 1 game day. Days unlock evolution:\n",
        decay_blurb(rules),
        rules.neglect_below,
        rules.day_length_secs
    );
    for (i, stage) in STAGES.iter().enumerate() {
        let _ = writeln!(
            out,
            "  Stage {}: {} {} ({} days)",
            i + 1,
            stage.name,
            stage.emoji,
            stage.days_required
        );
    }
    let _ = write!(
        out,
        "Evolving needs every stat at {:.0} or more. If any stat reaches 0, your spirit fades!",
        rules.evolve_min_stat
    );
    out
}

pub fn status_panel(pet: &PetState, previous: Option<&Stats>, color: bool) -> String {
    if !pet.is_alive {
        return game_over(pet);
    }
    let stage = pet.stage();
    let mut out = String::new();
    let _ = writeln!(out, "{} Name: {}", stage.emoji, pet.name);
    let _ = writeln!(
        out,
        "📊 Stage: {} ({}/{})",
        stage.name,
        pet.evolution_stage + 1,
        STAGES.len()
    );
    let _ = writeln!(out, "📅 Age: {} day(s)", pet.age_days);
    let _ = writeln!(out, "⏱️  Time alive: {}", time_alive(pet.time_alive_secs));
    let _ = writeln!(out, "🎮 Interactions: {}", pet.interactions);
    out.push('\n');

    for stat in Stat::ALL {
        let v = pet.stats.get(stat);
        let _ = write!(out, "  {} {}", stat_label(stat), stat_bar(v, color));
        if let Some(prev) = previous {
            let _ = write!(out, " {}", change_indicator(v, prev.get(stat)));
        }
        out.push('\n');
    }

    match pet.days_until_next_stage() {
        Some(0) => out.push_str("\n✨ Ready to evolve! Use 'evolve'."),
        Some(days) => {
            let _ = write!(out, "\n⏳ Next evolution in: {days} day(s)");
        }
        None => out.push_str("\n🌟 Maximum evolution reached!"),
    }

    let warnings = [
        (pet.stats.hunger, "is very hungry!"),
        (pet.stats.happiness, "is feeling sad!"),
        (pet.stats.health, "is in critical health!"),
    ];
    for (v, what) in warnings {
        if v < 30.0 {
            let _ = write!(out, "\n⚠️  {} {what}", pet.name);
        }
    }
    out
}

pub fn game_over(pet: &PetState) -> String {
    format!(
        "💀 GAME OVER 💀\n\
         Your spirit animal has faded away...\n\
         It lived for {} day(s).\n\
         Time alive: {}\n\
         Final stage: {}\n\n\
         Thank you for caring for {}. 🕊️",
        pet.age_days,
        time_alive(pet.time_alive_secs),
        pet.stage().name,
        pet.name
    )
}

pub fn victory(pet: &PetState) -> String {
    format!(
        "🎉 VICTORY! 🎉\n\
         {} {} has reached its ultimate form!\n\n\
         Final stats:\n   • Age: {} days\n   • Time alive: {}\n   • Interactions: {}\n\
         \u{20}  • Hunger: {:.0}%\n   • Happiness: {:.0}%\n   • Health: {:.0}%\n\n\
         You are a true Spirit Keeper! 🏆",
        pet.stage().emoji,
        pet.name,
        pet.age_days,
        time_alive(pet.time_alive_secs),
        pet.interactions,
        pet.stats.hunger,
        pet.stats.happiness,
        pet.stats.health
    )
}

pub fn goodbye(pet: &PetState) -> String {
    format!(
        "👋 Goodbye! You cared for {} for {} day(s) ({}).",
        pet.name,
        pet.age_days,
        time_alive(pet.time_alive_secs)
    )
}
