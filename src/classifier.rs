//! Assigns a [Category] to an SMS body using ordered keyword rules.

use crate::category::Category;

/// How a rule's keywords are tested against a lowercased SMS body.
#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Matches if the body contains at least one of the keywords.
    Any(&'static [&'static str]),
    /// Matches if the body contains every keyword.
    All(&'static [&'static str]),
}

impl Matcher {
    fn matches(&self, body: &str) -> bool {
        match self {
            Matcher::Any(keywords) => keywords.iter().any(|keyword| body.contains(keyword)),
            Matcher::All(keywords) => keywords.iter().all(|keyword| body.contains(keyword)),
        }
    }
}

/// A keyword rule and the category it assigns.
#[derive(Debug, Clone, Copy)]
struct CategoryRule {
    matcher: Matcher,
    category: Category,
}

/// The rules in priority order, the first matching rule wins.
///
/// "transferred to" must stay ahead of the "transferred" + "bank" rule so that
/// transfers to a bank agent's number count as mobile transfers.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        matcher: Matcher::Any(&["received"]),
        category: Category::IncomingMoney,
    },
    CategoryRule {
        matcher: Matcher::Any(&["transferred to"]),
        category: Category::TransfersToMobileNumbers,
    },
    CategoryRule {
        matcher: Matcher::Any(&["bank deposit"]),
        category: Category::BankDeposits,
    },
    CategoryRule {
        matcher: Matcher::Any(&["airtime"]),
        category: Category::AirtimeBillPayments,
    },
    CategoryRule {
        matcher: Matcher::Any(&["power"]),
        category: Category::CashPower,
    },
    CategoryRule {
        matcher: Matcher::Any(&["withdrawn", "agent withdrawal"]),
        category: Category::Withdrawal,
    },
    CategoryRule {
        matcher: Matcher::All(&["transferred", "bank"]),
        category: Category::BankTransfer,
    },
    CategoryRule {
        matcher: Matcher::Any(&["voice", "pack"]),
        category: Category::Pack,
    },
    CategoryRule {
        matcher: Matcher::Any(&["third party"]),
        category: Category::ThirdParty,
    },
    CategoryRule {
        matcher: Matcher::Any(&["payment of"]),
        category: Category::PaymentsToCodeHolders,
    },
];

/// Categorize an SMS body.
///
/// Matching is case-insensitive. Returns [Category::Uncategorized] if no rule
/// matches.
pub fn categorize(body: &str) -> Category {
    let body = body.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|rule| rule.matcher.matches(&body))
        .map_or(Category::Uncategorized, |rule| rule.category)
}

#[cfg(test)]
mod tests {
    use crate::category::Category;

    use super::categorize;

    #[test]
    fn each_rule_assigns_its_category() {
        let cases = [
            ("You have received 2000 RWF from Jane", Category::IncomingMoney),
            ("*165*S*10000 RWF transferred to Sam (250788000000)", Category::TransfersToMobileNumbers),
            ("A bank deposit of 40000 RWF has been added", Category::BankDeposits),
            ("Your payment of 3000 RWF to Airtime has been completed", Category::AirtimeBillPayments),
            ("Your payment of 5000 RWF to MTN Cash Power has been completed", Category::CashPower),
            ("You Abebe have via agent: Agent (250788) withdrawn 20000 RWF", Category::Withdrawal),
            ("Agent withdrawal of 5000 RWF", Category::Withdrawal),
            ("You have transferred 1000 RWF via Bank of Kigali", Category::BankTransfer),
            ("You have purchased an internet bundle pack of 1GB", Category::Pack),
            ("You bought a voice bundle", Category::Pack),
            ("A transaction of 3500 RWF by a third party was completed", Category::ThirdParty),
            ("TxId: 1234. Your payment of 1,500 RWF to Shop 1 has been completed", Category::PaymentsToCodeHolders),
            ("Hello! Dial *182# to check your account", Category::Uncategorized),
        ];

        for (body, want) in cases {
            assert_eq!(categorize(body), want, "wrong category for {body:?}");
        }
    }

    #[test]
    fn transferred_to_takes_priority_over_bank_transfer() {
        assert_eq!(
            categorize("You transferred to bank agent 500 RWF"),
            Category::TransfersToMobileNumbers
        );
    }

    #[test]
    fn received_takes_priority_over_later_rules() {
        assert_eq!(
            categorize("You have received 500 RWF airtime bonus"),
            Category::IncomingMoney
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(categorize("RECEIVED 100 RWF"), Category::IncomingMoney);
        assert_eq!(categorize("Cash POWER token"), Category::CashPower);
    }

    #[test]
    fn bank_transfer_needs_both_keywords() {
        assert_eq!(categorize("You transferred 500 RWF"), Category::Uncategorized);
        assert_eq!(categorize("Your bank statement"), Category::Uncategorized);
    }

    #[test]
    fn empty_body_is_uncategorized() {
        assert_eq!(categorize(""), Category::Uncategorized);
    }
}
