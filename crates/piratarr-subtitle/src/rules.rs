//! Rule tables for the translator.
//!
//! Phrases are applied in the order listed: a longer phrase must come
//! before any shorter phrase it contains. Words are looked up by their
//! lowercase form.

/// Multi-word phrase replacements, applied first and in order.
pub const PHRASES: &[(&str, &str)] = &[
    ("my friend", "me hearty"),
    ("my friends", "me hearties"),
    ("look at that", "shiver me timbers"),
    ("oh my god", "blow me down"),
    ("you all", "ye scallywags"),
    ("come here", "come 'ere"),
    ("over there", "o'er yonder"),
    ("right now", "right this instant, savvy"),
    ("I don't know", "I be not knowin'"),
    ("I don't", "I don't be"),
    ("don't you", "don't ye"),
    ("what do you", "what d'ye"),
    ("do you", "d'ye"),
    ("what are you", "what be ye"),
    ("where are you", "where be ye"),
    ("who are you", "who be ye"),
    ("are you", "be ye"),
    ("of course", "aye, o' course"),
    ("I am", "I be"),
    ("you are", "ye be"),
    ("they are", "they be"),
    ("we are", "we be"),
    ("it is", "it be"),
    ("there is", "there be"),
    ("there are", "there be"),
    ("he is", "he be"),
    ("she is", "she be"),
];

/// Single-word replacements keyed by lowercase word.
pub const WORDS: &[(&str, &str)] = &[
    // greetings and people
    ("hello", "ahoy"),
    ("hi", "ahoy"),
    ("hey", "ahoy"),
    ("greetings", "ahoy"),
    ("friend", "matey"),
    ("friends", "hearties"),
    ("buddy", "matey"),
    ("pal", "matey"),
    ("man", "landlubber"),
    ("dude", "bucko"),
    ("sir", "cap'n"),
    ("madam", "lass"),
    ("ma'am", "lass"),
    ("boy", "lad"),
    ("girl", "lass"),
    ("woman", "lass"),
    ("women", "lasses"),
    ("men", "scallywags"),
    ("children", "little scallywags"),
    ("child", "wee scallywag"),
    ("kid", "wee scallywag"),
    ("kids", "little scallywags"),
    ("people", "scallywags"),
    ("person", "soul"),
    ("stranger", "landlubber"),
    ("everyone", "all hands"),
    ("everybody", "all hands"),
    ("someone", "some scurvy dog"),
    ("anyone", "any scurvy dog"),
    ("nobody", "no scurvy dog"),
    // agreement
    ("yes", "aye"),
    ("yeah", "aye"),
    ("yep", "aye"),
    ("no", "nay"),
    ("nope", "nay"),
    ("never", "ne'er"),
    ("ever", "e'er"),
    ("forever", "fore'er"),
    ("okay", "aye aye"),
    ("ok", "aye aye"),
    ("sure", "aye"),
    // loot
    ("money", "doubloons"),
    ("cash", "doubloons"),
    ("gold", "booty"),
    ("treasure", "booty"),
    ("reward", "plunder"),
    ("dollar", "doubloon"),
    ("dollars", "doubloons"),
    ("coin", "piece o' eight"),
    ("coins", "pieces o' eight"),
    // drink
    ("drink", "grog"),
    ("drinks", "grog"),
    ("beer", "grog"),
    ("wine", "grog"),
    ("alcohol", "rum"),
    ("liquor", "rum"),
    ("whiskey", "rum"),
    // places and things
    ("water", "the briny deep"),
    ("ocean", "the seven seas"),
    ("sea", "the briny deep"),
    ("boat", "ship"),
    ("car", "ship"),
    ("vehicle", "vessel"),
    ("house", "quarters"),
    ("home", "port"),
    ("room", "cabin"),
    ("bed", "hammock"),
    ("jail", "the brig"),
    ("prison", "the brig"),
    ("bathroom", "the head"),
    ("floor", "deck"),
    ("door", "hatch"),
    ("window", "porthole"),
    ("stairs", "gangway"),
    ("kitchen", "the galley"),
    ("food", "grub"),
    ("meal", "grub"),
    ("dinner", "grub"),
    ("lunch", "grub"),
    ("breakfast", "mornin' grub"),
    ("eat", "feast upon"),
    ("eating", "feastin' upon"),
    ("flag", "Jolly Roger"),
    ("map", "chart"),
    ("boss", "captain"),
    ("leader", "captain"),
    ("manager", "captain"),
    ("teacher", "captain"),
    // violence and crime
    ("enemy", "scurvy dog"),
    ("enemies", "scurvy dogs"),
    ("fight", "battle"),
    ("fighting", "battlin'"),
    ("gun", "cannon"),
    ("guns", "cannons"),
    ("weapon", "cutlass"),
    ("weapons", "cutlasses"),
    ("knife", "dagger"),
    ("sword", "cutlass"),
    ("kill", "send to Davy Jones"),
    ("die", "meet Davy Jones"),
    ("died", "met Davy Jones"),
    ("dead", "in Davy Jones' locker"),
    ("death", "Davy Jones' locker"),
    ("steal", "plunder"),
    ("stole", "plundered"),
    ("stolen", "plundered"),
    ("stealing", "plunderin'"),
    ("rob", "pillage"),
    ("robbing", "pillagin'"),
    ("robbery", "pillagin'"),
    ("thief", "pirate"),
    ("criminal", "buccaneer"),
    // verbs
    ("look", "feast yer eyes"),
    ("looking", "lookin'"),
    ("see", "spy"),
    ("saw", "spied"),
    ("seeing", "spyin'"),
    ("watching", "keepin' a weather eye on"),
    ("run", "make haste"),
    ("running", "makin' haste"),
    ("walk", "swagger"),
    ("walking", "swaggerin'"),
    ("go", "set sail"),
    ("going", "settin' sail"),
    ("leave", "shove off"),
    ("leaving", "shovin' off"),
    ("come", "sail 'ere"),
    ("coming", "sailin' 'ere"),
    ("stop", "avast"),
    ("wait", "hold fast"),
    ("hurry", "look lively"),
    ("think", "reckon"),
    ("thinking", "reckonin'"),
    ("thought", "reckoned"),
    ("know", "be knowin'"),
    ("understand", "savvy"),
    // directions
    ("right", "starboard"),
    ("left", "port"),
    // adjectives
    ("happy", "jolly"),
    ("sad", "glum"),
    ("angry", "ornery"),
    ("scared", "lily-livered"),
    ("brave", "bold as brass"),
    ("stupid", "addled"),
    ("smart", "sharp as a tack"),
    ("crazy", "touched in the head"),
    ("drunk", "three sheets to the wind"),
    ("tired", "weary"),
    ("old", "barnacled"),
    ("young", "green"),
    ("big", "mighty"),
    ("small", "wee"),
    ("little", "wee"),
    ("beautiful", "fair"),
    ("ugly", "foul"),
    ("good", "fine"),
    ("bad", "foul"),
    ("great", "grand"),
    ("terrible", "cursed"),
    ("wonderful", "grand"),
    ("amazing", "blimey"),
    ("awesome", "grand"),
    ("cool", "shipshape"),
    ("nice", "fair"),
    // manners
    ("sorry", "beggin' yer pardon"),
    ("please", "if it please ye"),
    ("thanks", "much obliged"),
    ("thank", "be thankin'"),
    ("help", "lend a hand"),
    // grammar
    ("my", "me"),
    ("your", "yer"),
    ("yours", "yers"),
    ("you", "ye"),
    ("is", "be"),
    ("are", "be"),
    ("am", "be"),
    ("was", "were"),
    ("the", "th'"),
    ("to", "t'"),
    ("for", "fer"),
    ("of", "o'"),
    ("with", "wit'"),
    ("over", "o'er"),
    ("ing", "in'"),
];

/// Interjections appended after sentence-ending punctuation.
pub const EXCLAMATIONS: &[&str] = &[
    "Arrr!",
    "Yarr!",
    "Shiver me timbers!",
    "Blimey!",
    "Avast!",
    "Yo ho ho!",
    "By Blackbeard's ghost!",
    "Savvy?",
];

/// Chance of an exclamation after each run of `.`, `!` or `?`.
pub const EXCLAMATION_CHANCE: f64 = 0.12;
