//! Synapse equation fragments: base units, temporal kernels and plasticity rules.
//!
//! A synapse model is the combination, in this order, of the fragments of a base unit
//! ([`BASE_UNITS`]), of a kernel ([`KERNELS`]) and of a plasticity rule ([`PLASTICITY_MODELS`]).
//! Default parameters depend on the base unit: each [`SynapseMode`] carries the parameter
//! tables of the kernels and plasticity rules it supports.
//!
//! To replace an equation of the base unit from a kernel or plasticity fragment, prefix the
//! variable with `%`, e.g., `%kernel_e = ...` or `%d{synvar_e}/dt = ...`.
use lazy_static::lazy_static;

use super::{Fragment, Registry, NONE};
use crate::quantity::{parameter_map, ParameterMap, Quantity};
use crate::{I0, KAPPA_N, KAPPA_P, UT};

/// Concrete names bound to the generic synaptic variables and unit of the fragments.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct UnitBinding {
    /// Bound to `{synvar_e}`.
    pub synvar_e: &'static str,
    /// Bound to `{synvar_i}`.
    pub synvar_i: &'static str,
    /// Bound to `{unit}`.
    pub unit: &'static str,
}

/// Binding of current-based synapses, also used for DPI synapses and imported models.
pub const CURRENT_BINDING: UnitBinding = UnitBinding {
    synvar_e: "Ie_syn",
    synvar_i: "Ii_syn",
    unit: "amp",
};

/// Binding of conductance-based synapses.
pub const CONDUCTANCE_BINDING: UnitBinding = UnitBinding {
    synvar_e: "gIe",
    synvar_i: "gIi",
    unit: "siemens",
};

/// A synapse base unit, i.e., the nature of the synaptic variable.
#[derive(Debug, PartialEq, Clone)]
pub struct SynapseMode {
    /// The fragments of the base model, merged in order.
    pub fragments: Vec<Fragment<'static>>,
    /// The names bound to the placeholders of the merged equations.
    pub binding: UnitBinding,
    /// The default parameters of the base model.
    pub parameters: ParameterMap,
    /// The default parameters of every supported kernel.
    pub kernel_parameters: Registry<ParameterMap>,
    /// The default parameters of every supported plasticity rule.
    pub plasticity_parameters: Registry<ParameterMap>,
}

/// Exponentially decaying synaptic variable, the base of current and conductance synapses.
pub const TEMPLATE: Fragment<'static> = Fragment::new(
    "
        d{synvar_e}/dt = (-{synvar_e}) / tausyne + kernel_e : {unit} (clock-driven)
        d{synvar_i}/dt = (-{synvar_i}) / tausyni + kernel_i : {unit} (clock-driven)

        kernel_e : {unit} * second **-1
        kernel_i : {unit} * second **-1

        Ie{input_number}_post = Ie_syn : amp  (summed)
        Ii{input_number}_post = Ii_syn : amp  (summed)
        weight : 1
        w_plast : 1
        tausyne : second (constant)
        tausyni : second (constant)

        baseweight_e : {unit} (constant)
        baseweight_i : {unit} (constant)
        ",
    "
        {synvar_e} += baseweight_e * weight * w_plast * (weight>0)
        {synvar_i} += baseweight_i * weight * w_plast * (weight<0)
        ",
    " ",
);

/// Reversal potentials turning the conductances into synaptic currents.
pub const REVERSAL: Fragment<'static> = Fragment::new(
    "
        Ie_syn = {synvar_e}*(EIe - Vm_post) : amp
        Ii_syn = {synvar_i}*(EIi - Vm_post) : amp
        EIe : volt (shared, constant)             # excitatory reversal potential
        EIi : volt (shared, constant)             # inhibitory reversal potential
        ",
    " ",
    " ",
);

/// Differential pair integrator (DPI) synapse, a saturating log-domain filter.
pub const DPI: Fragment<'static> = Fragment::new(
    "
        dIe_syn/dt = (-Ie_syn - Ie_gain + 2*Io_syn*(Ie_syn<=Io_syn))/(tausyne*((Ie_gain/Ie_syn)+1)) : amp (clock-driven)
        dIi_syn/dt = (-Ii_syn - Ii_gain + 2*Io_syn*(Ii_syn<=Io_syn))/(tausyni*((Ii_gain/Ii_syn)+1)) : amp (clock-driven)

        Ie{input_number}_post = Ie_syn : amp  (summed)
        Ii{input_number}_post = -Ii_syn : amp  (summed)

        weight : 1
        w_plast : 1

        Ie_gain = Io_syn*(Ie_syn<=Io_syn) + Ie_th*(Ie_syn>Io_syn) : amp
        Ii_gain = Io_syn*(Ii_syn<=Io_syn) + Ii_th*(Ii_syn>Io_syn) : amp

        Itau_e = Io_syn*(Ie_syn<=Io_syn) + Ie_tau*(Ie_syn>Io_syn) : amp
        Itau_i = Io_syn*(Ii_syn<=Io_syn) + Ii_tau*(Ii_syn>Io_syn) : amp

        baseweight_e : amp (constant)
        baseweight_i : amp (constant)
        tausyne = Csyn * Ut_syn /(kappa_syn * Itau_e) : second
        tausyni = Csyn * Ut_syn /(kappa_syn * Itau_i) : second
        kappa_syn = (kn_syn + kp_syn) / 2 : 1

        Iw_e = weight*baseweight_e  : amp
        Iw_i = -weight*baseweight_i  : amp

        Ie_tau       : amp (constant)
        Ii_tau       : amp (constant)
        Ie_th        : amp (constant)
        Ii_th        : amp (constant)
        kn_syn       : 1 (constant)
        kp_syn       : 1 (constant)
        Ut_syn       : volt (constant)
        Io_syn       : amp (constant)
        Csyn         : farad (constant)
        ",
    "
        Ie_syn += Iw_e*w_plast*Ie_gain*(weight>0)/(Itau_e*((Ie_gain/Ie_syn)+1))
        Ii_syn += Iw_i*w_plast*Ii_gain*(weight<0)/(Itau_i*((Ii_gain/Ii_syn)+1))
        ",
    " ",
);

/// Alpha kernel: the synaptic input rises before it decays.
pub const ALPHA_KERNEL: Fragment<'static> = Fragment::new(
    "
        %kernel_e = baseweight_e*(weight>0)*w_plast*weight*exp(1-t_spike/tausyne_rise)/tausyne : {unit} * second **-1
        %kernel_i = baseweight_i*(weight<0)*w_plast*weight*exp(1-t_spike/tausyni_rise)/tausyni : {unit} * second **-1
        dt_spike/dt = 1 : second (clock-driven)
        tausyne_rise : second
        tausyni_rise : second
        ",
    "
        t_spike = 0 * ms
        ",
    " ",
);

/// Resonant kernel: damped oscillation of the synaptic input.
pub const RESONANT_KERNEL: Fragment<'static> = Fragment::new(
    "
        omega : 1/second
        %kernel_e = baseweight_e*(weight>0)*w_plast*(weight*exp(-t_spike/tausyne_rise)*cos(omega*t_spike))/tausyne : {unit} * second **-1
        %kernel_i = baseweight_i*(weight<0)*w_plast*(weight*exp(-t_spike/tausyni_rise)*cos(omega*t_spike))/tausyni : {unit} * second **-1
        dt_spike/dt = 1 : second (clock-driven)
        tausyne_rise : second
        tausyni_rise : second
        ",
    "
        t_spike = 0 * ms
        ",
    " ",
);

/// Gaussian kernel: the decay time grows with the time since the last spike.
pub const GAUSSIAN_KERNEL: Fragment<'static> = Fragment::new(
    "
        %tausyne = (sigma_gaussian_e**2)/t_spike : second
        %tausyni = (sigma_gaussian_i**2)/t_spike : second
        sigma_gaussian_e : second
        sigma_gaussian_i : second

        dt_spike/dt = 1 : second (clock-driven)
        ",
    "t_spike = 0 * ms",
    " ",
);

/// Fusi learning rule, driven by a calcium trace and bistable weights.
pub const FUSI: Fragment<'static> = Fragment::new(
    "
        dCa/dt = (-Ca/tau_ca) : volt (event-driven)

        updrift = 1.0*(w>theta_w) : 1
        downdrift = 1.0*(w<=theta_w) : 1

        dw/dt = (alpha*updrift)-(beta*downdrift) : 1 (event-driven)

        wplus : 1 (shared)
        wminus : 1 (shared)
        theta_upl : volt (shared, constant)
        theta_uph : volt (shared, constant)
        theta_downh : volt (shared, constant)
        theta_downl : volt (shared, constant)
        theta_V : volt (shared, constant)
        alpha : 1/second (shared, constant)
        beta : 1/second (shared, constant)
        tau_ca : second (shared, constant)
        w_min : 1 (shared, constant)
        w_max : 1 (shared, constant)
        theta_w : 1 (shared, constant)
        w_ca : volt (shared, constant)
        ",
    "
        up = 1. * (Vm_post>theta_V) * (Ca>theta_upl) * (Ca<theta_uph)
        down = 1. * (Vm_post<theta_V) * (Ca>theta_downl) * (Ca<theta_downh)
        w += wplus * up - wminus * down
        w = clip(w, w_min, w_max)
        w_plast = floor(w+0.5)
        ",
    "Ca += w_ca",
);

/// Pair-based spike timing dependent plasticity.
pub const STDP: Fragment<'static> = Fragment::new(
    "
        dApre/dt = -Apre / taupre : 1 (event-driven)
        dApost/dt = -Apost / taupost : 1 (event-driven)
        w_max : 1 (shared, constant)
        taupre : second (shared, constant)
        taupost : second (shared, constant)
        dApre : 1 (shared, constant)
        Q_diffAPrePost : 1 (shared, constant)
        ",
    "
        Apre += dApre*w_max
        w_plast = clip(w_plast + Apost, 0, w_max)
        ",
    "
        Apost += -dApre * (taupre / taupost) * Q_diffAPrePost * w_max
        w_plast = clip(w_plast + Apre, 0, w_max)
        ",
);

fn fusi_parameters() -> ParameterMap {
    parameter_map(&[
        ("wplus", Quantity::scalar(0.2)),
        ("wminus", Quantity::scalar(0.2)),
        ("theta_upl", Quantity::new(180.0, "mV")),
        ("theta_uph", Quantity::new(1.0, "volt")),
        ("theta_downh", Quantity::new(90.0, "mV")),
        ("theta_downl", Quantity::new(50.0, "mV")),
        ("theta_V", Quantity::new(-59.0, "mV")),
        ("alpha", Quantity::new(0.0001, "second**-1")),
        ("beta", Quantity::new(0.0001, "second**-1")),
        ("tau_ca", Quantity::new(8.0, "ms")),
        ("w_ca", Quantity::new(250.0, "mV")),
        ("w_min", Quantity::scalar(0.0)),
        ("w_max", Quantity::scalar(1.0)),
        ("theta_w", Quantity::scalar(0.5)),
        ("w", Quantity::scalar(0.0)),
    ])
}

fn current_mode() -> SynapseMode {
    SynapseMode {
        fragments: vec![TEMPLATE],
        binding: CURRENT_BINDING,
        parameters: parameter_map(&[
            ("tausyne", Quantity::new(5.0, "ms")),
            ("tausyni", Quantity::new(5.0, "ms")),
            ("w_plast", Quantity::scalar(1.0)),
            ("baseweight_e", Quantity::new(1.0, "nA")),
            ("baseweight_i", Quantity::new(1.0, "nA")),
            ("kernel_e", Quantity::new(0.0, "nA * ms**-1")),
            ("kernel_i", Quantity::new(0.0, "nA * ms**-1")),
        ]),
        kernel_parameters: [
            ("exponential", ParameterMap::new()),
            (
                "alpha",
                parameter_map(&[
                    ("tausyne", Quantity::new(2.0, "ms")),
                    ("tausyni", Quantity::new(2.0, "ms")),
                    ("tausyne_rise", Quantity::new(0.5, "ms")),
                    ("tausyni_rise", Quantity::new(0.5, "ms")),
                ]),
            ),
            (
                "resonant",
                parameter_map(&[
                    ("tausyne", Quantity::new(2.0, "ms")),
                    ("tausyni", Quantity::new(2.0, "ms")),
                    ("omega", Quantity::new(7.0, "ms**-1")),
                    ("tausyne_rise", Quantity::new(0.5, "ms")),
                    ("tausyni_rise", Quantity::new(0.5, "ms")),
                ]),
            ),
            (
                "gaussian",
                parameter_map(&[
                    ("sigma_gaussian_e", Quantity::new(6.0, "ms")),
                    ("sigma_gaussian_i", Quantity::new(6.0, "ms")),
                ]),
            ),
        ]
        .into_iter()
        .collect(),
        plasticity_parameters: [
            ("non_plastic", ParameterMap::new()),
            ("fusi", fusi_parameters()),
            (
                "stdp",
                parameter_map(&[
                    ("baseweight_e", Quantity::new(7.0, "pA")),
                    ("baseweight_i", Quantity::new(7.0, "pA")),
                    ("taupre", Quantity::new(10.0, "ms")),
                    ("taupost", Quantity::new(10.0, "ms")),
                    ("w_max", Quantity::scalar(1.0)),
                    ("dApre", Quantity::scalar(0.1)),
                    ("Q_diffAPrePost", Quantity::scalar(1.05)),
                    ("w_plast", Quantity::scalar(0.0)),
                ]),
            ),
        ]
        .into_iter()
        .collect(),
    }
}

fn conductance_mode() -> SynapseMode {
    SynapseMode {
        fragments: vec![TEMPLATE, REVERSAL],
        binding: CONDUCTANCE_BINDING,
        parameters: parameter_map(&[
            ("tausyne", Quantity::new(5.0, "ms")),
            ("tausyni", Quantity::new(6.0, "ms")),
            ("EIe", Quantity::new(60.0, "mV")),
            ("EIi", Quantity::new(-90.0, "mV")),
            ("w_plast", Quantity::scalar(1.0)),
            ("baseweight_e", Quantity::new(7.0, "nS")),
            ("baseweight_i", Quantity::new(3.0, "nS")),
            ("kernel_e", Quantity::new(0.0, "nS * ms**-1")),
            ("kernel_i", Quantity::new(0.0, "nS * ms**-1")),
        ]),
        kernel_parameters: [
            ("exponential", ParameterMap::new()),
            (
                "alpha",
                parameter_map(&[
                    ("tausyne", Quantity::new(2.0, "ms")),
                    ("tausyni", Quantity::new(2.0, "ms")),
                    ("tausyne_rise", Quantity::new(1.0, "ms")),
                    ("tausyni_rise", Quantity::new(1.0, "ms")),
                ]),
            ),
            (
                "resonant",
                parameter_map(&[
                    ("tausyne", Quantity::new(2.0, "ms")),
                    ("tausyni", Quantity::new(2.0, "ms")),
                    ("omega", Quantity::new(1.0, "ms**-1")),
                    ("tausyne_rise", Quantity::new(1.0, "ms")),
                    ("tausyni_rise", Quantity::new(1.0, "ms")),
                ]),
            ),
            (
                "gaussian",
                parameter_map(&[
                    ("sigma_gaussian_e", Quantity::new(6.0, "ms")),
                    ("sigma_gaussian_i", Quantity::new(6.0, "ms")),
                ]),
            ),
        ]
        .into_iter()
        .collect(),
        plasticity_parameters: [
            ("non_plastic", ParameterMap::new()),
            ("fusi", fusi_parameters()),
            (
                "stdp",
                parameter_map(&[
                    ("baseweight_e", Quantity::new(7.0, "nS")),
                    ("baseweight_i", Quantity::new(3.0, "nS")),
                    ("taupre", Quantity::new(20.0, "ms")),
                    ("taupost", Quantity::new(20.0, "ms")),
                    ("w_max", Quantity::scalar(0.01)),
                    ("dApre", Quantity::scalar(0.01)),
                    ("Q_diffAPrePost", Quantity::scalar(1.05)),
                    ("w_plast", Quantity::scalar(0.0)),
                ]),
            ),
        ]
        .into_iter()
        .collect(),
    }
}

fn dpi_mode() -> SynapseMode {
    let current = current_mode();
    SynapseMode {
        fragments: vec![DPI],
        binding: CURRENT_BINDING,
        parameters: parameter_map(&[
            ("Io_syn", Quantity::new(I0, "pA")),
            ("kn_syn", Quantity::scalar(KAPPA_N)),
            ("kp_syn", Quantity::scalar(KAPPA_P)),
            ("Ut_syn", Quantity::new(UT, "mV")),
            ("Csyn", Quantity::new(1.5, "pF")),
            ("Ie_tau", Quantity::new(10.0, "pA")),
            ("Ii_tau", Quantity::new(10.0, "pA")),
            ("Ie_th", Quantity::new(10.0, "pA")),
            ("Ii_th", Quantity::new(10.0, "pA")),
            ("Ie_syn", Quantity::new(I0, "pA")),
            ("Ii_syn", Quantity::new(I0, "pA")),
            ("w_plast", Quantity::scalar(1.0)),
            ("baseweight_e", Quantity::new(50.0, "pA")),
            ("baseweight_i", Quantity::new(50.0, "pA")),
        ]),
        // the DPI filter is its own kernel
        kernel_parameters: [("exponential", ParameterMap::new())].into_iter().collect(),
        plasticity_parameters: current.plasticity_parameters,
    }
}

lazy_static! {
    /// Synapse base units, indexed by name.
    pub static ref BASE_UNITS: Registry<SynapseMode> = [
        ("current", current_mode()),
        ("conductance", conductance_mode()),
        ("DPI", dpi_mode()),
    ]
    .into_iter()
    .collect();

    /// Temporal kernels, indexed by name.
    pub static ref KERNELS: Registry<Fragment<'static>> = [
        ("exponential", NONE),
        ("alpha", ALPHA_KERNEL),
        ("resonant", RESONANT_KERNEL),
        ("gaussian", GAUSSIAN_KERNEL),
    ]
    .into_iter()
    .collect();

    /// Plasticity rules, indexed by name.
    pub static ref PLASTICITY_MODELS: Registry<Fragment<'static>> = [
        ("non_plastic", NONE),
        ("fusi", FUSI),
        ("stdp", STDP),
    ]
    .into_iter()
    .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_tables_cover_fragments() {
        for (name, mode) in BASE_UNITS.iter() {
            for kernel in mode.kernel_parameters.keys() {
                assert!(KERNELS.contains_key(kernel), "{}: kernel {}", name, kernel);
            }
            for plasticity in mode.plasticity_parameters.keys() {
                assert!(
                    PLASTICITY_MODELS.contains_key(plasticity),
                    "{}: plasticity {}",
                    name,
                    plasticity
                );
            }
        }
    }

    #[test]
    fn test_dpi_supports_exponential_kernel_only() {
        let dpi = &BASE_UNITS["DPI"];
        assert_eq!(dpi.kernel_parameters.keys().collect::<Vec<_>>(), vec![&"exponential"]);
        assert_eq!(dpi.binding, CURRENT_BINDING);
    }

    #[test]
    fn test_templates_declare_input_slot() {
        assert!(TEMPLATE.model.contains("Ie{input_number}_post"));
        assert!(DPI.model.contains("Ii{input_number}_post"));
    }
}
