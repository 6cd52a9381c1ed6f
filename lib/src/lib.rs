use malachite::num::arithmetic::traits::Lcm;
use malachite::num::basic::traits::One;
use malachite::{Natural, Rational};
use mendeleev::{ALL_ELEMENTS, Element};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter::zip;





/// Tolerance below which a value is treated as zero during elimination
/// and as an exact integer during fraction reconstruction
pub const EPSILON: f64 = 1e-9;

/// Largest denominator considered when reconstructing a coefficient as a fraction
pub const MAX_DENOMINATOR: i64 = 1000;





/// Errors that can occur while balancing a chemical equation
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum BalanceError {
    /// Entered equation is not of the form `<left side> = <right side>`
    InvalidEquation,
    /// A compound token is not a sequence of element symbols with optional counts
    InvalidCompound,
    /// A symbol in a compound does not name a known element
    InvalidElement,
    /// Rows of the balance matrix have inconsistent lengths
    WrongMatrixDimensions,
    /// The homogeneous system only has the trivial all-zero solution
    NoSolution,
    /// The solution space has more than one free variable
    Underdetermined,
    /// A fraction was requested with a zero denominator
    ZeroDenominator,
    /// Coefficients were calculated, but do not balance the equation
    InvalidSolution,
}
impl Display for BalanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceError::InvalidEquation => write!(f, "Invalid equation"),
            BalanceError::InvalidCompound => write!(f, "Invalid compound"),
            BalanceError::InvalidElement => write!(f, "Invalid element"),
            BalanceError::WrongMatrixDimensions => write!(f, "Wrong matrix dimensions"),
            BalanceError::NoSolution => write!(f, "No solution"),
            BalanceError::Underdetermined => write!(f, "Equation cannot be balanced uniquely"),
            BalanceError::ZeroDenominator => write!(f, "Fraction with zero denominator"),
            BalanceError::InvalidSolution => write!(f, "Invalid solution"),
        }
    }
}
impl Error for BalanceError {}





/// A struct that represents a chemical equation (e.g. H2 + O2 = H2O)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Equation {
    /// String from which the equation was parsed
    original_str: String,
    /// A vector of reactants
    reactants: Vec<Compound>,
    /// A vector of products
    products: Vec<Compound>,
    /// A vector of solutions for reactants (stoichiometric coefficients)
    solutions_reactants: Option<Vec<i64>>,
    /// A vector of solutions for products (stoichiometric coefficients)
    solutions_products: Option<Vec<i64>>,
}
impl Equation {
    /// Create new equation from a plain text string
    /// The equation should contain exactly one `=` separating reactants from products,
    /// with compounds on each side joined by `+`
    /// # Arguments
    /// * `input` - equation string
    /// # Returns
    /// * `Ok` - equation
    /// * `Err` - error that occurred during parsing
    /// # Example
    /// ```
    /// use chembal::{Compound, Equation};
    ///
    /// let equation = Equation::parse("H2 + O2 = H2O").unwrap();
    ///
    /// let expected_reactants = vec![
    ///     Compound::parse("H2").unwrap(),
    ///     Compound::parse("O2").unwrap(),
    /// ];
    /// let expected_products = vec![Compound::parse("H2O").unwrap()];
    ///
    /// assert_eq!(equation.reactants(), &expected_reactants);
    /// assert_eq!(equation.products(), &expected_products);
    /// ```
    pub fn parse(input: &str) -> Result<Self, BalanceError> {
        let original_str = input.trim().to_string();

        let sides: Vec<&str> = original_str.split('=').collect();
        if sides.len() != 2 {
            return Err(BalanceError::InvalidEquation);
        }

        let parse_side = |side: &str| -> Result<Vec<Compound>, BalanceError> {
            let mut compounds = Vec::new();
            for token in side.split('+') {
                let token = token.trim();
                if token.is_empty() {
                    return Err(BalanceError::InvalidEquation);
                }
                compounds.push(Compound::parse(token)?);
            }
            Ok(compounds)
        };

        let reactants = parse_side(sides[0])?;
        let products = parse_side(sides[1])?;

        Ok(Self {
            original_str,
            reactants,
            products,
            solutions_reactants: None,
            solutions_products: None,
        })
    }

    /// Solves the equation for the smallest positive integer stoichiometric coefficients
    /// # Returns
    /// * `Ok` - if the equation was solved successfully
    /// * `Err` - if the equation was not solved successfully
    /// # Example
    /// ```
    /// use chembal::Equation;
    ///
    /// let mut equation = Equation::parse("H2 + O2 = H2O").unwrap();
    /// equation.solve().unwrap();
    ///
    /// assert_eq!(equation.solution_reactants().unwrap(), &[2, 1]);
    /// assert_eq!(equation.solution_products().unwrap(), &[2]);
    /// ```
    pub fn solve(&mut self) -> Result<(), BalanceError> {
        let elements = element_index(&self.reactants, &self.products);
        let matrix = balance_matrix(&elements, &self.reactants, &self.products);

        let reals = solve_homogeneous(&matrix)?;
        let fractions = reals
            .iter()
            .map(|&value| approximate_fraction(value, MAX_DENOMINATOR))
            .collect::<Result<Vec<Rational>, BalanceError>>()?;
        let coefficients = scale_to_integers(&fractions)?;

        if coefficients.iter().any(|&c| c <= 0) {
            return Err(BalanceError::InvalidSolution);
        }

        let (reactants_solutions, products_solutions) = coefficients.split_at(self.reactants.len());

        // substitute the coefficients back and compare atom counts on both sides
        let mut reactants_counts: HashMap<Element, i64> = HashMap::new();
        for (compound, coefficient) in zip(self.reactants.iter(), reactants_solutions.iter()) {
            for (element, quantity) in compound.elements.iter() {
                *reactants_counts.entry(*element).or_insert(0) += quantity * coefficient;
            }
        }
        let mut products_counts: HashMap<Element, i64> = HashMap::new();
        for (compound, coefficient) in zip(self.products.iter(), products_solutions.iter()) {
            for (element, quantity) in compound.elements.iter() {
                *products_counts.entry(*element).or_insert(0) += quantity * coefficient;
            }
        }
        if reactants_counts != products_counts {
            return Err(BalanceError::InvalidSolution);
        }

        self.solutions_reactants = Some(reactants_solutions.to_vec());
        self.solutions_products = Some(products_solutions.to_vec());

        Ok(())
    }

    /// Returns the original string from which the equation was parsed
    pub fn original_str(&self) -> &str {
        &self.original_str
    }

    /// Returns the vector of reactants
    pub fn reactants(&self) -> &Vec<Compound> {
        &self.reactants
    }

    /// Returns the vector of products
    pub fn products(&self) -> &Vec<Compound> {
        &self.products
    }

    /// Returns the vector of solutions for reactants (stoichiometric coefficients)
    /// # Returns
    /// * `Option<&Vec<i64>>` - vector of solutions for reactants
    pub fn solution_reactants(&self) -> Option<&Vec<i64>> {
        self.solutions_reactants.as_ref()
    }

    /// Returns the vector of solutions for products (stoichiometric coefficients)
    /// # Returns
    /// * `Option<&Vec<i64>>` - vector of solutions for products
    pub fn solution_products(&self) -> Option<&Vec<i64>> {
        self.solutions_products.as_ref()
    }

    /// Returns the solution of the equation as a string
    /// Every coefficient is printed, including 1
    /// # Returns
    /// * `Option<String>` - solution of the equation as a string
    /// # Example
    /// ```
    /// use chembal::Equation;
    ///
    /// let mut equation = Equation::parse("H2 + O2 = H2O").unwrap();
    /// equation.solve().unwrap();
    ///
    /// assert_eq!(equation.solution_str().unwrap(), "2H2 + 1O2 = 2H2O");
    /// ```
    pub fn solution_str(&self) -> Option<String> {
        let sols_reacts = self.solutions_reactants.as_ref()?;
        let sols_prods = self.solutions_products.as_ref()?;

        let reactants_str = zip(self.reactants.iter(), sols_reacts.iter())
            .map(|(compound, quantity)| format!("{}{}", quantity, compound.original_str))
            .collect::<Vec<String>>()
            .join(" + ");
        let products_str = zip(self.products.iter(), sols_prods.iter())
            .map(|(compound, quantity)| format!("{}{}", quantity, compound.original_str))
            .collect::<Vec<String>>()
            .join(" + ");

        Some(format!("{} = {}", reactants_str, products_str))
    }
}

/// A struct that represents a chemical compound (e.g. H2O, NaCl, ...)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Compound {
    /// String from which the compound was parsed
    original_str: String,
    /// Elements and their quantities, in order of first appearance
    elements: Vec<(Element, i64)>,
}
impl Compound {
    /// Create new compound from a plain text token
    /// The token is a sequence of element symbols (one uppercase letter, optionally
    /// followed by one lowercase letter), each with an optional count; a missing
    /// count means 1
    /// # Arguments
    /// * `token` - compound token, e.g. "H2O"
    /// # Returns
    /// * `Ok` - compound
    /// * `Err` - error that occurred during parsing
    /// # Example
    /// ```
    /// use chembal::Compound;
    /// use mendeleev::Element;
    ///
    /// let compound = Compound::parse("C2H5OH").unwrap();
    ///
    /// let expected = vec![(Element::C, 2), (Element::H, 6), (Element::O, 1)];
    /// assert_eq!(compound.elements(), &expected);
    /// ```
    pub fn parse(token: &str) -> Result<Self, BalanceError> {
        let letters: Vec<char> = token.chars().collect();
        if letters.is_empty() {
            return Err(BalanceError::InvalidCompound);
        }

        let mut elements: Vec<(Element, i64)> = Vec::new();
        let mut pos = 0;

        while pos < letters.len() {
            // one uppercase letter, optionally one lowercase letter
            if !letters[pos].is_ascii_uppercase() {
                return Err(BalanceError::InvalidCompound);
            }
            let mut symbol = letters[pos].to_string();
            pos += 1;
            if pos < letters.len() && letters[pos].is_ascii_lowercase() {
                symbol.push(letters[pos]);
                pos += 1;
            }
            let element = *ALL_ELEMENTS
                .iter()
                .find(|e| e.symbol() == symbol)
                .ok_or(BalanceError::InvalidElement)?;

            // optional digit sequence, absent means 1
            let mut digits = String::new();
            while pos < letters.len() && letters[pos].is_ascii_digit() {
                digits.push(letters[pos]);
                pos += 1;
            }
            let quantity = if digits.is_empty() {
                1
            } else {
                digits.parse::<i64>().map_err(|_| BalanceError::InvalidCompound)?
            };
            if quantity == 0 {
                return Err(BalanceError::InvalidCompound);
            }

            match elements.iter_mut().find(|(e, _)| *e == element) {
                Some((_, q)) => *q += quantity,
                None => elements.push((element, quantity)),
            }
        }

        Ok(Self {
            original_str: token.to_string(),
            elements,
        })
    }

    /// Returns the original string from which the compound was parsed
    pub fn original_str(&self) -> &str {
        &self.original_str
    }

    /// Returns the elements and their quantities in order of first appearance
    pub fn elements(&self) -> &Vec<(Element, i64)> {
        &self.elements
    }

    /// Returns the number of atoms of `element` in the compound, 0 if absent
    pub fn count_of(&self, element: Element) -> i64 {
        self.elements
            .iter()
            .find(|(e, _)| *e == element)
            .map_or(0, |(_, q)| *q)
    }
}





/// Collects every element appearing in the equation, deduplicated,
/// in order of first discovery
/// The returned order defines the row order of the balance matrix
/// # Example
/// ```
/// use chembal::{Compound, element_index};
/// use mendeleev::Element;
///
/// let reactants = vec![Compound::parse("H2").unwrap(), Compound::parse("O2").unwrap()];
/// let products = vec![Compound::parse("H2O").unwrap()];
///
/// assert_eq!(element_index(&reactants, &products), vec![Element::H, Element::O]);
/// ```
pub fn element_index(reactants: &[Compound], products: &[Compound]) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::new();
    for compound in reactants.iter().chain(products.iter()) {
        for (element, _) in compound.elements.iter() {
            if !elements.contains(element) {
                elements.push(*element);
            }
        }
    }
    elements
}

/// Builds the atom balance matrix for the equation
/// Entry (r, c) is the atom count of element r in compound c,
/// negated for product columns
/// # Arguments
/// * `elements` - row order, as produced by [`element_index`]
/// * `reactants` - left side compounds
/// * `products` - right side compounds
pub fn balance_matrix(elements: &[Element], reactants: &[Compound], products: &[Compound]) -> Vec<Vec<f64>> {
    let cols = reactants.len() + products.len();
    let mut matrix = vec![vec![0.0; cols]; elements.len()];
    for (row, element) in elements.iter().enumerate() {
        for (col, compound) in reactants.iter().enumerate() {
            matrix[row][col] = compound.count_of(*element) as f64;
        }
        for (col, compound) in products.iter().enumerate() {
            matrix[row][reactants.len() + col] = -(compound.count_of(*element) as f64);
        }
    }
    matrix
}

/// Finds a non-trivial solution of the homogeneous system `matrix * x = 0`
///
/// Performs Gauss-Jordan elimination with the pivot searched downward from the
/// current rank: for each column the first row at or below the rank with magnitude
/// above [`EPSILON`] is swapped into the pivot slot, normalized to 1 and eliminated
/// from every other row. Columns without such a row are free.
///
/// Exactly one free column must remain; its value is fixed to 1.0 and the pivot
/// columns are back-substituted from right to left.
/// # Returns
/// * `Ok` - a length-C vector in the null space
/// * `Err(NoSolution)` - the matrix is empty or every column is a pivot column
/// * `Err(Underdetermined)` - more than one free column remains
/// # Example
/// ```
/// use chembal::solve_homogeneous;
///
/// // H2 + O2 = H2O, rows are H and O
/// let matrix = vec![
///     vec![2.0, 0.0, -2.0],
///     vec![0.0, 2.0, -1.0],
/// ];
///
/// assert_eq!(solve_homogeneous(&matrix).unwrap(), vec![1.0, 0.5, 1.0]);
/// ```
pub fn solve_homogeneous(matrix: &[Vec<f64>]) -> Result<Vec<f64>, BalanceError> {
    let rows = matrix.len();
    if rows == 0 {
        return Err(BalanceError::NoSolution);
    }
    let cols = matrix[0].len();
    if cols == 0 {
        return Err(BalanceError::NoSolution);
    }
    for row in matrix.iter().skip(1) {
        if row.len() != cols {
            return Err(BalanceError::WrongMatrixDimensions);
        }
    }

    let mut m: Vec<Vec<f64>> = matrix.to_vec();

    // pivot row of each column, None marks a free column
    let mut pivot_rows: Vec<Option<usize>> = vec![None; cols];
    let mut rank = 0;

    for col in 0..cols {
        let Some(sel) = (rank..rows).find(|&row| m[row][col].abs() > EPSILON) else {
            continue;
        };
        m.swap(rank, sel);
        pivot_rows[col] = Some(rank);

        let pivot = m[rank][col];
        for j in col..cols {
            m[rank][j] /= pivot;
        }

        for row in 0..rows {
            if row != rank && m[row][col].abs() > EPSILON {
                let factor = m[row][col];
                for j in col..cols {
                    let sub_amount = factor * m[rank][j];
                    m[row][j] -= sub_amount;
                }
            }
        }

        rank += 1;
    }

    let free_count = pivot_rows.iter().filter(|p| p.is_none()).count();
    if free_count == 0 {
        return Err(BalanceError::NoSolution);
    }
    if free_count > 1 {
        return Err(BalanceError::Underdetermined);
    }

    // each pivot row encodes "pivot variable + sum of later columns = 0" in reduced form
    let mut solution = vec![0.0; cols];
    for col in (0..cols).rev() {
        match pivot_rows[col] {
            None => solution[col] = 1.0,
            Some(row) => {
                let sum: f64 = ((col + 1)..cols).map(|j| m[row][j] * solution[j]).sum();
                solution[col] = -sum;
            }
        }
    }

    Ok(solution)
}

/// Creates a fraction in lowest terms from a numerator and a denominator
/// # Returns
/// * `Ok` - the fraction
/// * `Err(ZeroDenominator)` - the denominator is zero
pub fn fraction(numerator: i64, denominator: i64) -> Result<Rational, BalanceError> {
    if denominator == 0 {
        return Err(BalanceError::ZeroDenominator);
    }
    Ok(Rational::from_signeds(numerator, denominator))
}

/// Converts a real number to the closest fraction reachable by a continued
/// fraction expansion whose denominator stays within `max_denominator`
///
/// A value within [`EPSILON`] of an integer is returned as that integer over 1.
/// Otherwise convergents are produced by the standard recurrence and the last
/// one within the denominator bound is returned, in lowest terms.
/// # Example
/// ```
/// use chembal::approximate_fraction;
/// use malachite::Rational;
///
/// let frac = approximate_fraction(0.5, 1000).unwrap();
/// assert_eq!(frac, Rational::from_signeds(1, 2));
/// ```
pub fn approximate_fraction(value: f64, max_denominator: i64) -> Result<Rational, BalanceError> {
    let mut x = value;
    let mut a = x.floor() as i64;
    if (x - a as f64).abs() < EPSILON {
        return fraction(a, 1);
    }

    let (mut num_prev, mut den_prev) = (1_i64, 0_i64);
    let (mut num, mut den) = (a, 1_i64);

    while den <= max_denominator {
        let residual = x - a as f64;
        if residual.abs() < EPSILON {
            break;
        }
        x = 1.0 / residual;
        a = x.floor() as i64;

        // widened so that one huge partial quotient cannot overflow before the bound check
        let num_next = a as i128 * num as i128 + num_prev as i128;
        let den_next = a as i128 * den as i128 + den_prev as i128;
        if den_next > max_denominator as i128 {
            break;
        }

        (num_prev, den_prev) = (num, den);
        (num, den) = (num_next as i64, den_next as i64);
    }

    fraction(num, den)
}

/// Scales a sequence of fractions to integers by the least common multiple
/// of their denominators
///
/// Every output is exact since the LCM is a common multiple of every denominator.
/// # Example
/// ```
/// use chembal::scale_to_integers;
/// use malachite::Rational;
///
/// let fractions = vec![
///     Rational::from(2),
///     Rational::from_signeds(3, 2),
///     Rational::from(1),
/// ];
///
/// assert_eq!(scale_to_integers(&fractions).unwrap(), vec![4, 3, 2]);
/// ```
pub fn scale_to_integers(fractions: &[Rational]) -> Result<Vec<i64>, BalanceError> {
    let mut lcm = Natural::ONE;
    for frac in fractions.iter() {
        lcm = lcm.lcm(frac.denominator_ref());
    }
    let lcm = Rational::from(&lcm);

    fractions
        .iter()
        .map(|frac| {
            let scaled = frac * &lcm;
            i64::try_from(&scaled).map_err(|_| BalanceError::InvalidSolution)
        })
        .collect()
}





#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(equation: &str, balanced: &str) {
        let mut eq = Equation::parse(equation).unwrap();
        eq.solve().unwrap();

        assert_eq!(eq.solution_str().unwrap(), balanced);
    }


    #[test]
    fn parse_simple_compounds() {
        let water = Compound::parse("H2O").unwrap();
        assert_eq!(water.elements(), &vec![(Element::H, 2), (Element::O, 1)]);

        let iron = Compound::parse("Fe").unwrap();
        assert_eq!(iron.elements(), &vec![(Element::Fe, 1)]);
    }

    #[test]
    fn parse_accumulates_repeated_elements() {
        let ethanol = Compound::parse("C2H5OH").unwrap();
        assert_eq!(
            ethanol.elements(),
            &vec![(Element::C, 2), (Element::H, 6), (Element::O, 1)]
        );
    }

    #[test]
    fn parse_is_idempotent() {
        assert_eq!(Compound::parse("Fe2O3").unwrap(), Compound::parse("Fe2O3").unwrap());
    }

    #[test]
    fn parse_rejects_leading_digit() {
        assert_eq!(Compound::parse("2H2"), Err(BalanceError::InvalidCompound));
    }

    #[test]
    fn parse_rejects_unknown_symbol() {
        assert_eq!(Compound::parse("Xx"), Err(BalanceError::InvalidElement));
    }

    #[test]
    fn parse_rejects_zero_count() {
        assert_eq!(Compound::parse("H0"), Err(BalanceError::InvalidCompound));
    }

    #[test]
    fn parse_rejects_empty_token() {
        assert_eq!(Compound::parse(""), Err(BalanceError::InvalidCompound));
    }

    #[test]
    fn count_of_missing_element_is_zero() {
        let water = Compound::parse("H2O").unwrap();
        assert_eq!(water.count_of(Element::Fe), 0);
    }

    #[test]
    fn equation_requires_single_equals() {
        assert_eq!(Equation::parse("H2 + O2"), Err(BalanceError::InvalidEquation));
        assert_eq!(Equation::parse("H2 = O2 = H2O"), Err(BalanceError::InvalidEquation));
    }

    #[test]
    fn equation_rejects_empty_side() {
        assert_eq!(Equation::parse("= H2O"), Err(BalanceError::InvalidEquation));
        assert_eq!(Equation::parse("H2 + = H2O"), Err(BalanceError::InvalidEquation));
    }

    #[test]
    fn element_index_keeps_first_seen_order() {
        let reactants = vec![
            Compound::parse("Na2CO3").unwrap(),
            Compound::parse("HCl").unwrap(),
        ];
        let products = vec![Compound::parse("NaCl").unwrap()];

        assert_eq!(
            element_index(&reactants, &products),
            vec![Element::Na, Element::C, Element::O, Element::H, Element::Cl]
        );
    }

    #[test]
    fn balance_matrix_negates_products() {
        let reactants = vec![Compound::parse("H2").unwrap(), Compound::parse("O2").unwrap()];
        let products = vec![Compound::parse("H2O").unwrap()];
        let elements = element_index(&reactants, &products);

        let matrix = balance_matrix(&elements, &reactants, &products);
        assert_eq!(matrix, vec![vec![2.0, 0.0, -2.0], vec![0.0, 2.0, -1.0]]);
    }

    #[test]
    fn solver_finds_null_space_vector() {
        let matrix = vec![vec![2.0, 0.0, -2.0], vec![0.0, 2.0, -1.0]];
        assert_eq!(solve_homogeneous(&matrix).unwrap(), vec![1.0, 0.5, 1.0]);
    }

    #[test]
    fn solver_rejects_empty_matrix() {
        assert_eq!(solve_homogeneous(&[]), Err(BalanceError::NoSolution));
        assert_eq!(solve_homogeneous(&[vec![]]), Err(BalanceError::NoSolution));
    }

    #[test]
    fn solver_rejects_ragged_matrix() {
        let matrix = vec![vec![1.0, 2.0], vec![1.0]];
        assert_eq!(solve_homogeneous(&matrix), Err(BalanceError::WrongMatrixDimensions));
    }

    #[test]
    fn solver_rejects_full_rank_system() {
        // only the trivial solution exists
        let matrix = vec![vec![1.0, 0.0], vec![0.0, -1.0]];
        assert_eq!(solve_homogeneous(&matrix), Err(BalanceError::NoSolution));
    }

    #[test]
    fn solver_rejects_two_free_columns() {
        let matrix = vec![vec![1.0, 0.0, -1.0, 0.0], vec![0.0, 2.0, 0.0, -2.0]];
        assert_eq!(solve_homogeneous(&matrix), Err(BalanceError::Underdetermined));
    }

    #[test]
    fn fraction_rejects_zero_denominator() {
        assert_eq!(fraction(1, 0), Err(BalanceError::ZeroDenominator));
    }

    #[test]
    fn fraction_reduces_to_lowest_terms() {
        assert_eq!(fraction(4, 6).unwrap(), Rational::from_signeds(2, 3));
    }

    #[test]
    fn approximate_simple_fractions() {
        assert_eq!(approximate_fraction(0.5, 1000).unwrap(), Rational::from_signeds(1, 2));
        assert_eq!(approximate_fraction(1.5, 1000).unwrap(), Rational::from_signeds(3, 2));
        assert_eq!(approximate_fraction(1.0 / 3.0, 1000).unwrap(), Rational::from_signeds(1, 3));
        assert_eq!(approximate_fraction(-1.5, 1000).unwrap(), Rational::from_signeds(-3, 2));
    }

    #[test]
    fn approximate_near_integers() {
        assert_eq!(approximate_fraction(2.0000000001, 1000).unwrap(), Rational::from(2));
        assert_eq!(approximate_fraction(-3.0, 1000).unwrap(), Rational::from(-3));
        assert_eq!(approximate_fraction(0.0, 1000).unwrap(), Rational::from(0));
    }

    #[test]
    fn scale_produces_exact_integers() {
        let fractions = vec![
            Rational::from_signeds(1, 6),
            Rational::from_signeds(1, 10),
            Rational::from(1),
        ];
        assert_eq!(scale_to_integers(&fractions).unwrap(), vec![5, 3, 30]);
    }

    #[test]
    fn solved_coefficients_balance_atom_counts() {
        let mut eq = Equation::parse("Fe + O2 = Fe2O3").unwrap();
        eq.solve().unwrap();

        let elements = element_index(eq.reactants(), eq.products());
        let matrix = balance_matrix(&elements, eq.reactants(), eq.products());
        let coefficients: Vec<i64> = eq
            .solution_reactants()
            .unwrap()
            .iter()
            .chain(eq.solution_products().unwrap().iter())
            .copied()
            .collect();

        for row in matrix.iter() {
            let net: f64 = zip(row.iter(), coefficients.iter())
                .map(|(entry, coefficient)| entry * *coefficient as f64)
                .sum();
            assert_eq!(net, 0.0);
        }
    }

    #[test]
    fn identical_sides_do_not_crash() {
        check("H2O = H2O", "1H2O = 1H2O");
    }

    #[test]
    fn duplicated_compounds_are_rejected() {
        let mut eq = Equation::parse("C + O2 = C + O2").unwrap();
        assert_eq!(eq.solve(), Err(BalanceError::Underdetermined));
    }

    #[test]
    fn unbalanceable_equation_is_rejected() {
        let mut eq = Equation::parse("H = O").unwrap();
        assert_eq!(eq.solve(), Err(BalanceError::NoSolution));
    }

    #[test]
    fn leading_digit_in_equation_is_a_parse_error() {
        assert_eq!(Equation::parse("2H2 + O2 = H2O"), Err(BalanceError::InvalidCompound));
    }


    #[test]
    fn eq1() {
        check("H2 + O2 = H2O", "2H2 + 1O2 = 2H2O");
    }

    #[test]
    fn eq2() {
        check("Fe + O2 = Fe2O3", "4Fe + 3O2 = 2Fe2O3");
    }

    #[test]
    fn eq3() {
        check("P4O10 + H2O = H3PO4", "1P4O10 + 6H2O = 4H3PO4");
    }

    #[test]
    fn eq4() {
        check("CO2 + H2O = C6H12O6 + O2", "6CO2 + 6H2O = 1C6H12O6 + 6O2");
    }

    #[test]
    fn eq5() {
        check("SiCl4 + H2O = H4SiO4 + HCl", "1SiCl4 + 4H2O = 1H4SiO4 + 4HCl");
    }

    #[test]
    fn eq6() {
        check("Al + HCl = AlCl3 + H2", "2Al + 6HCl = 2AlCl3 + 3H2");
    }

    #[test]
    fn eq7() {
        check("Na2CO3 + HCl = NaCl + H2O + CO2", "1Na2CO3 + 2HCl = 2NaCl + 1H2O + 1CO2");
    }

    #[test]
    fn eq8() {
        check("C7H6O2 + O2 = CO2 + H2O", "2C7H6O2 + 15O2 = 14CO2 + 6H2O");
    }

    #[test]
    fn eq9() {
        check("KClO3 = KClO4 + KCl", "4KClO3 = 3KClO4 + 1KCl");
    }

    #[test]
    fn eq10() {
        check("H2SO4 + HI = H2S + I2 + H2O", "1H2SO4 + 8HI = 1H2S + 4I2 + 4H2O");
    }

    #[test]
    fn eq11() {
        check("C2H6 + O2 = CO2 + H2O", "2C2H6 + 7O2 = 4CO2 + 6H2O");
    }

    #[test]
    fn eq12() {
        check("NaN3 = Na + N2", "2NaN3 = 2Na + 3N2");
    }

    #[test]
    fn eq13() {
        check("Na + Fe2O3 = Na2O + Fe", "6Na + 1Fe2O3 = 3Na2O + 2Fe");
    }

    #[test]
    fn eq14() {
        check("Mg + N2 = Mg3N2", "3Mg + 1N2 = 1Mg3N2");
    }

    #[test]
    fn eq15() {
        check("Na + NH3 = NaNH2 + H2", "2Na + 2NH3 = 2NaNH2 + 1H2");
    }

    #[test]
    fn eq16() {
        check("Na2O + CO2 + H2O = NaHCO3", "1Na2O + 2CO2 + 1H2O = 2NaHCO3");
    }

    #[test]
    fn eq17() {
        check("P4S3 + O2 = P4O6 + SO2", "1P4S3 + 6O2 = 1P4O6 + 3SO2");
    }

    #[test]
    fn eq18() {
        check("C8H18 + O2 = CO2 + H2O", "2C8H18 + 25O2 = 16CO2 + 18H2O");
    }

    #[test]
    fn eq19() {
        check("C2H6O + O2 = CO2 + H2O", "1C2H6O + 3O2 = 2CO2 + 3H2O");
    }

    #[test]
    fn eq20() {
        check("N2O5 = NO2 + O2", "2N2O5 = 4NO2 + 1O2");
    }

    #[test]
    fn eq21() {
        check("KClO3 = KCl + O2", "2KClO3 = 2KCl + 3O2");
    }

    #[test]
    fn eq22() {
        check("CO + O2 = CO2", "2CO + 1O2 = 2CO2");
    }

    #[test]
    fn eq23() {
        check("C57H110O6 + O2 = CO2 + H2O", "2C57H110O6 + 163O2 = 114CO2 + 110H2O");
    }

    #[test]
    fn eq24() {
        check("MoS2 + O2 = MoO3 + SO2", "2MoS2 + 7O2 = 2MoO3 + 4SO2");
    }

    #[test]
    fn eq25() {
        check("S + HNO3 = H2SO4 + NO2 + H2O", "1S + 6HNO3 = 1H2SO4 + 6NO2 + 2H2O");
    }

    #[test]
    fn eq26() {
        check("Pt + HNO3 + HCl = H2PtCl6 + NO2 + H2O", "1Pt + 4HNO3 + 6HCl = 1H2PtCl6 + 4NO2 + 4H2O");
    }

    #[test]
    fn eq27() {
        check("LuCl3 + Ca = Lu + CaCl2", "2LuCl3 + 3Ca = 2Lu + 3CaCl2");
    }

    #[test]
    fn eq28() {
        check("XeF6 + H2O = XeO3 + HF", "1XeF6 + 3H2O = 1XeO3 + 6HF");
    }

    #[test]
    fn eq29() {
        check("Ba2XeO6 + H2SO4 = BaSO4 + H2O + XeO4", "1Ba2XeO6 + 2H2SO4 = 2BaSO4 + 2H2O + 1XeO4");
    }

    #[test]
    fn eq30() {
        check("P4O6 + H2O = H3PO3", "1P4O6 + 6H2O = 4H3PO3");
    }

    #[test]
    fn eq31() {
        check("C6H14 + O2 = CO2 + H2O", "2C6H14 + 19O2 = 12CO2 + 14H2O");
    }

    #[test]
    fn eq32() {
        check("AgN3 = N2 + Ag", "2AgN3 = 3N2 + 2Ag");
    }

    #[test]
    fn eq33() {
        check("CuS + HNO3 = CuSO4 + NO2 + H2O", "1CuS + 8HNO3 = 1CuSO4 + 8NO2 + 4H2O");
    }

    #[test]
    fn eq34() {
        check("NaBr + NaBrO3 + H2SO4 = Br2 + Na2SO4 + H2O", "5NaBr + 1NaBrO3 + 3H2SO4 = 3Br2 + 3Na2SO4 + 3H2O");
    }

    #[test]
    fn eq35() {
        check("KNO3 + C12H22O11 = N2 + CO2 + H2O + K2CO3", "48KNO3 + 5C12H22O11 = 24N2 + 36CO2 + 55H2O + 24K2CO3");
    }

    #[test]
    fn eq36() {
        check("K2MnF6 + SbF5 = KSbF6 + MnF3 + F2", "2K2MnF6 + 4SbF5 = 4KSbF6 + 2MnF3 + 1F2");
    }
}
