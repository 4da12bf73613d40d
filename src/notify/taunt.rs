use rand::seq::SliceRandom;
use rand::Rng;

/// Call-out phrase and the GIF tag searched alongside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Taunt {
    pub phrase: &'static str,
    pub gif_tag: &'static str,
}

const fn taunt(phrase: &'static str, gif_tag: &'static str) -> Taunt {
    Taunt { phrase, gif_tag }
}

pub const TAUNTS: &[Taunt] = &[
    taunt("you almost had it buddy maybe next time", "almost had it"),
    taunt("looks like early bird does not catch the worm", "early bird fail"),
    taunt("how disappointing!", "disappointed"),
    taunt("did you even try?", "did you even try"),
    taunt("the birds are crying for you", "crying bird"),
    taunt("that's not flying, that's falling with style", "falling with style"),
    taunt("even a penguin could score higher", "penguin fail"),
    taunt("skill issue", "skill issue"),
    taunt("maybe try checkers instead", "you stink"),
    taunt("the nest egg is looking a little empty", "empty nest"),
    taunt("were you playing with your eyes closed?", "eyes closed"),
    taunt("not your finest migration", "bad migration"),
    taunt("even garrett could've scored better than this", "you suck"),
    taunt("honk honk", "clown"),
];

/// Uniformly random taunt
pub fn pick_taunt<R: Rng + ?Sized>(rng: &mut R) -> Taunt {
    // TAUNTS is a non-empty constant
    *TAUNTS.choose(rng).unwrap_or(&TAUNTS[0])
}

/// `"<mentions> <phrase>"`, plus the GIF URL on its own line when one was found
pub fn compose_taunt(mentions: &[String], taunt: &Taunt, gif_url: Option<&str>) -> String {
    let mut msg = format!("{} {}", mentions.join(" "), taunt.phrase);
    if let Some(url) = gif_url.filter(|u| !u.is_empty()) {
        msg.push('\n');
        msg.push_str(url);
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_taunt_comes_from_list() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = pick_taunt(&mut rng);
            assert!(TAUNTS.contains(&picked));
        }
    }

    #[test]
    fn test_every_taunt_has_a_tag() {
        assert_eq!(TAUNTS.len(), 14);
        assert!(TAUNTS.iter().all(|t| !t.phrase.is_empty() && !t.gif_tag.is_empty()));
    }

    #[test]
    fn test_compose_with_and_without_gif() {
        let mentions = vec!["<@1>".to_string(), "<@2>".to_string()];
        let taunt = Taunt { phrase: "skill issue", gif_tag: "skill issue" };

        assert_eq!(compose_taunt(&mentions, &taunt, None), "<@1> <@2> skill issue");
        assert_eq!(
            compose_taunt(&mentions, &taunt, Some("https://gif.test/a.gif")),
            "<@1> <@2> skill issue\nhttps://gif.test/a.gif"
        );
        assert_eq!(compose_taunt(&mentions, &taunt, Some("")), "<@1> <@2> skill issue");
    }
}
