/// SQL `LIKE` match: `wildcard` matches any run of characters (including
/// none) and `_` matches exactly one. No escape character.
pub(crate) fn like_matches(text: &str, pattern: &str, wildcard: char) -> bool {
    let text = text.chars().collect::<Vec<_>>();
    let pattern = pattern.chars().collect::<Vec<_>>();

    let (mut t, mut p) = (0, 0);
    // Last wildcard position in the pattern and the text offset it resumes at.
    let mut backtrack: Option<(usize, usize)> = None;

    while let Some(&c) = text.get(t) {
        match pattern.get(p) {
            Some(&w) if w == wildcard => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&x) if x == '_' || x == c => {
                p += 1;
                t += 1;
            }
            _ => {
                let Some((wp, wt)) = backtrack else {
                    return false;
                };
                backtrack = Some((wp, wt + 1));
                p = wp + 1;
                t = wt + 1;
            }
        }
    }

    pattern.get(p..).is_some_and(|rest| rest.iter().all(|&w| w == wildcard))
}
