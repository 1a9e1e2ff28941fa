//! Neuron equation fragments.
//!
//! A neuron model is built from a base unit ([`BASE_UNITS`]) and five equation sets picked
//! from the equation sets of that base unit: adaptation, integration mode, leak, position and noise.
//! The `pre` and `post` blocks of a neuron fragment hold the threshold condition and the reset statements.
use lazy_static::lazy_static;

use super::{Fragment, Registry, NONE};
use crate::quantity::{parameter_map, ParameterMap, Quantity};
use crate::{I0, KAPPA_N, KAPPA_P, UT};

/// An equation set together with its default parameters.
#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub fragment: Fragment<'static>,
    pub parameters: ParameterMap,
}

impl Block {
    fn new(fragment: Fragment<'static>, parameters: ParameterMap) -> Self {
        Block {
            fragment,
            parameters,
        }
    }
}

/// A neuron base unit and the equation sets it can be combined with.
#[derive(Debug, PartialEq, Clone)]
pub struct NeuronMode {
    pub template: Block,
    pub equation_sets: Registry<Block>,
}

/// Silicon neuron following the DPI circuit (Chicca et al. 2014), state variable `Imem`.
pub const I_MODEL_TEMPLATE: Fragment<'static> = Fragment::new(
    "
        dImem/dt = (((Ith_clip / Itau_clip) * (Iin_clip  + Ia_clip - Ishunt_clip - Iahp_clip)) - Ith_clip - ((1 + ((Ishunt_clip + Iahp_clip - Ia_clip) / Itau_clip)) * Imem)) / (tau * ((Ith_clip/(Imem + Io)) + 1)) : amp (unless refractory)

        Iahp      : amp
        Ia        : amp
        Iahp_clip : amp

        Itau_clip = Itau*(Imem>Io) + Io*(Imem<=Io)  : amp
        Ith_clip = Ith*(Imem>Io) + Io*(Imem<=Io)    : amp
        Iin_clip = clip(Iin+Iconst,Io, 1*amp) : amp
        Ia_clip = Ia*(Imem>Io) + 2*Io*(Imem<=Io)    : amp
        Ithahp_clip = Ithahp*(Iahp>Io) + Io*(Iahp<=Io) : amp
        Ishunt_clip = clip(Ishunt, Io, Imem) : amp

        tau = (Cmem * Ut) / (kappa * Itau_clip) : second
        kappa = (kn + kp) / 2 : 1

        Inoise  : amp

        kn      : 1 (constant)
        kp      : 1 (constant)
        Ut      : volt (constant)
        Io      : amp (constant)
        Cmem    : farad (constant)
        Ispkthr : amp (constant)
        Ireset  : amp (constant)
        refP    : second    (constant)
        Ith     : amp (constant)
        Itau    : amp (constant)
        Iconst  : amp (constant)
        Ishunt  : amp (constant)
        Ica     : amp (constant)
        ",
    "Imem > Ispkthr",
    "Imem = Ireset;",
);

/// Integrate and fire neuron, state variable `Vm`.
pub const V_MODEL_TEMPLATE: Fragment<'static> = Fragment::new(
    "
        dVm/dt  = (Ileak + Iexp + Iin + Iconst + Inoise - Iadapt)/Cm  : volt (unless refractory)
        Ileak   : amp

        Iexp    : amp
        Iadapt  : amp
        Inoise  : amp
        Iconst  : amp
        Cm      : farad     (constant)
        refP    : second    (constant)
        Vthr    : volt
        Vres    : volt      (constant)
        gL      : siemens   (constant)
        ",
    "Vm > Vthr",
    "
        Vm = Vres;
        ",
);

/// Leaky integrate and fire neuron with stochastic decay (Wang et al. 2018), in discrete time.
pub const Q_MODEL_TEMPLATE: Fragment<'static> = Fragment::new(
    "
        dVm/dt = (int(not refrac)*int(normal_decay) + int(refrac)*int(refractory_decay))*mV/second : volt
        normal_decay = clip(dec_term1 - dec_term2 - dec_term3 + Vrest/mV + g_psc*I/mV + Vm_noise/mV, Vrest/mV, Vm_max) : 1
        refractory_decay = clip(refrac_dec_term1 - refrac_dec_term2 + Vrest/mV, 0, Vrest/mV) : 1

        dec_term1 = clip(stochastic_decay(Vm/mV, decay_numerator, rand_num_bits), Vrest/mV, Vm_max) : 1 (constant over dt)
        dec_term2 = stochastic_decay(Vrest/mV, decay_numerator, rand_num_bits) : 1 (constant over dt)
        dec_term3 = stochastic_decay(g_psc*I/mV, decay_numerator, rand_num_bits) : 1 (constant over dt)
        refrac_dec_term1 = stochastic_decay(Vm/mV, refrac_decay_numerator, rand_num_bits) : 1 (constant over dt)
        refrac_dec_term2 = stochastic_decay(Vrest/mV, refrac_decay_numerator, rand_num_bits) : 1 (constant over dt)

        I = clip(I_syn + Iconst, I_min, I_max) : amp
        dI_syn/dt = int(syn_dec_term1)*mA/second : amp
        syn_dec_term1 = stochastic_decay(I_clip/mA, syn_decay_numerator, rand_num_bits) : 1 (constant over dt)
        I_clip = clip(I_syn, I_min, I_max) : amp

        refrac = Vm<Vrest : boolean

        g_psc             : ohm    (constant)
        Iconst            : amp
        Vm_noise          : volt
        tau               : second (constant)
        tausyn            : second (constant)
        refrac_tau        : second (constant)
        refP              : second
        rand_num_bits     : 1      (constant, shared)
        Vthr              : volt   (constant)
        Vm_max            : 1      (constant)
        I_min             : amp    (constant)
        I_max             : amp    (constant)
        Vrest             : volt   (constant)
        Vreset            : volt   (constant)
        decay_numerator        : 1 (constant)
        refrac_decay_numerator : 1 (constant)
        syn_decay_numerator    : 1 (constant)
        ",
    "Vm>=Vthr",
    "
        Vm=Vreset;
        Vm_noise = 0*mV",
);

/// Exponential current of the adaptive exponential I&F model.
pub const V_EXP_CURRENT: Fragment<'static> = Fragment::new(
    "
        %Iexp = gL*DeltaT*exp((Vm - VT)/DeltaT) : amp
        %Vthr = (VT + 5 * DeltaT) : volt

        VT      : volt (constant)
        DeltaT  : volt (constant)  # slope factor
        ",
    "",
    " ",
);

/// Quadratic current of the Izhikevich model, parameters after Nicola & Clopath 2017.
pub const V_QUAD_CURRENT: Fragment<'static> = Fragment::new(
    "
        %Iexp = k*(Vm - VR)*(Vm - VT) : amp
        %tauIadapt = 1.0/a            : second
        %gAdapt = b                   : siemens
        %wIadapt = d                  : amp
        %EL = VR                      : volt

        VT      : volt                (constant)  # integration threshold
        Vpeak   : volt                (constant)  # spike threshold
        VR      : volt                (constant)  # resting potential
        k       : siemens * volt **-1 (constant)
        a       : second **-1         (constant)  # recovery rate
        b       : siemens             (constant)
        c       : volt                (constant)  # reset potential
        d       : amp                 (constant)  # after-spike adaptation increment
        %Vthr = Vpeak : volt
        %Vres = VR : volt
        ",
    "",
    "
        %Vm = c;
        Iadapt += wIadapt;
        ",
);

/// Linear leak towards `EL`.
pub const V_LEAK: Fragment<'static> = Fragment::new(
    "
        %Ileak = -gL*(Vm - EL) : amp

        EL : volt (constant)
        ",
    "",
    "
    ",
);

/// Spike-triggered and subthreshold adaptation current.
pub const V_ADAPT: Fragment<'static> = Fragment::new(
    "
        %dIadapt/dt = -(gAdapt*(EL - Vm) + Iadapt)/tauIadapt : amp

        tauIadapt : second  (constant)
        gAdapt    : siemens (constant)
        wIadapt   : amp     (constant)
        EL        : volt    (constant)
        ",
    "",
    "
        Iadapt += wIadapt;
        ",
);

/// Threshold increasing with every spike and decaying back to `thr_min`.
pub const THR_ADAPT: Fragment<'static> = Fragment::new(
    "
        %dVthr/dt = -(Vthr-thr_min)/tau_thr : volt

        tau_thr : second (constant)
        thr_inc : volt   (constant)
        thr_min : volt   (constant)
        thr_max : volt   (constant)
        ",
    "",
    "
        Vthr = clip(Vthr+thr_inc, thr_min, thr_max)
        ",
);

/// Discrete time version of [`THR_ADAPT`].
pub const QUANTIZED_THR_ADAPT: Fragment<'static> = Fragment::new(
    "
        %dVthr/dt = Vthr*decay_thresh/second + (thr_min*dt*decay_thresh/tau_thr)/second : volt
        decay_thresh = tau_thr/(tau_thr + dt) : 1

        tau_thr : second (constant)
        thr_inc : volt   (constant)
        thr_min : volt   (constant)
        thr_max : volt   (constant)
        ",
    "",
    "
        Vthr = clip(Vthr+thr_inc, thr_min, thr_max)
        ",
);

/// White noise current.
pub const V_NOISE: Fragment<'static> = Fragment::new(
    "
        %Inoise = xi*Anoise*(second**0.5) : amp

        Anoise : amp (constant)
        ",
    "",
    " ",
);

/// Location of the neuron on a 2d grid.
pub const SPATIAL: Fragment<'static> = Fragment::new(
    "
        x : 1 (constant)
        y : 1 (constant)
        ",
    "",
    " ",
);

/// Leaky spike counter.
pub const ACTIVITY: Fragment<'static> = Fragment::new(
    "
        dActivity/dt = -Activity/tauAct : 1

        tauAct : second (constant)
        ",
    "",
    "
        Activity += 1;
        ",
);

/// Gaussian noise current of the silicon neuron.
pub const I_NOISE: Fragment<'static> = Fragment::new(
    "
        %Inoise = b * (sigma * randn() + mu) : amp (constant over dt)
        b = sign(2 * rand() -1)              : 1   (constant over dt)

        mu    : amp
        sigma : amp
        ",
    "",
    "
        ",
);

/// Positive feedback current of the silicon neuron.
pub const I_A: Fragment<'static> = Fragment::new(
    "
        %Ia = Iagain / (1 + exp(-(Imem - Iath) / Ianorm)) : amp
        %Ia_clip = Ia*(Imem>Io) + 2*Io*(Imem<=Io)         : amp

        Iagain : amp (constant)
        Iath   : amp (constant)
        Ianorm : amp (constant)
        ",
    "",
    "
        ",
);

/// Calcium driven after-hyperpolarization current of the silicon neuron.
pub const I_AHP: Fragment<'static> = Fragment::new(
    "
        %dIahp/dt = (- Ithahp_clip - Iahp + 2*Io*(Iahp<=Io)) / (tauahp * (Ithahp_clip / Iahp + 1)) : amp
        %Iahp_clip = Iahp*(Imem>Io) + Io*(Imem<=Io)  : amp
        tauahp = (Cahp * Ut) / (kappa * Itauahp) : second
        Iahpmax = (Ica / Itauahp) * Ithahp_clip : amp
        Ithahp : amp (constant)
        Itauahp : amp (constant)
        Cahp : farad (constant)
        ",
    "",
    "
        Iahp += Iahpmax;
        ",
);

/// Gain modulation of the silicon neuron.
pub const I_GM: Fragment<'static> = Fragment::new(
    "
        dIpred/dt = (1 - Ipred)/tau_pred  : 1
        tau_pred : second (constant)
        ",
    "",
    "",
);

/// Proxies of the membrane activity, updated by external operations.
pub const I_ACT: Fragment<'static> = Fragment::new(
    "
        normalized_activity_proxy : 1
        activity_proxy : amp
        ",
    "",
    "
        ",
);

/// Random numbers drawn from a linear feedback shift register.
pub const LFSR: Fragment<'static> = Fragment::new(
    "
        %decay_probability = lfsr_timedarray( ((seed+t) % lfsr_max_value) + lfsr_init ) / (2**lfsr_num_bits) : 1

        lfsr_max_value : second
        seed : second
        lfsr_init : second
        lfsr_num_bits : 1
        ",
    "",
    "
        ",
);

fn thr_adapt_parameters() -> ParameterMap {
    parameter_map(&[
        ("tau_thr", Quantity::new(60000.0, "ms")),
        ("thr_min", Quantity::new(4.0, "mV")),
        ("thr_max", Quantity::new(16.0, "mV")),
        ("thr_inc", Quantity::new(0.01, "mV")),
    ])
}

fn current_mode() -> NeuronMode {
    let template = parameter_map(&[
        ("Inoise", Quantity::new(I0, "pA")),
        ("Iconst", Quantity::new(I0, "pA")),
        ("kn", Quantity::scalar(KAPPA_N)),
        ("kp", Quantity::scalar(KAPPA_P)),
        ("Ut", Quantity::new(UT, "mV")),
        ("Io", Quantity::new(I0, "pA")),
        ("Cmem", Quantity::new(1.5, "pF")),
        ("Ia", Quantity::new(I0, "pA")),
        ("Ica", Quantity::new(I0, "pA")),
        ("Iahp", Quantity::new(I0, "pA")),
        ("Ishunt", Quantity::new(I0, "pA")),
        ("Ispkthr", Quantity::new(1.0, "nA")),
        ("Ireset", Quantity::new(0.6, "pA")),
        ("Ith", Quantity::new(0.9, "pA")),
        ("Itau", Quantity::new(8.0, "pA")),
        ("refP", Quantity::new(1.0, "ms")),
    ]);

    let equation_sets = [
        (
            "calcium_feedback",
            Block::new(
                I_AHP,
                parameter_map(&[
                    ("Itauahp", Quantity::new(1.0, "pA")),
                    ("Ithahp", Quantity::new(1.0, "pA")),
                    ("Ica", Quantity::new(2.0, "pA")),
                    ("Cahp", Quantity::new(1.0, "pF")),
                ]),
            ),
        ),
        (
            "exponential",
            Block::new(
                I_A,
                parameter_map(&[
                    ("Ith", Quantity::new(0.9, "pA")),
                    ("Iath", Quantity::new(0.5, "nA")),
                    ("Iagain", Quantity::new(50.0, "pA")),
                    ("Ianorm", Quantity::new(10.0, "pA")),
                    ("Itau", Quantity::new(8.0, "pA")),
                ]),
            ),
        ),
        ("leaky", Block::new(NONE, ParameterMap::new())),
        (
            "non_leaky",
            Block::new(NONE, parameter_map(&[("Itau", Quantity::new(I0, "pA"))])),
        ),
        ("quadratic", Block::new(NONE, ParameterMap::new())),
        ("spatial", Block::new(SPATIAL, ParameterMap::new())),
        (
            "gaussian",
            Block::new(
                I_NOISE,
                parameter_map(&[
                    ("mu", Quantity::new(0.25, "pA")),
                    ("sigma", Quantity::new(0.1, "pA")),
                ]),
            ),
        ),
        ("none", Block::new(NONE, ParameterMap::new())),
        ("linear", Block::new(NONE, ParameterMap::new())),
        (
            "gain_modulation",
            Block::new(
                I_GM,
                parameter_map(&[
                    ("Ipred", Quantity::scalar(1.0)),
                    ("tau_pred", Quantity::new(1.5, "ms")),
                ]),
            ),
        ),
        ("activity", Block::new(I_ACT, ParameterMap::new())),
    ]
    .into_iter()
    .collect();

    NeuronMode {
        template: Block::new(I_MODEL_TEMPLATE, template),
        equation_sets,
    }
}

fn voltage_mode() -> NeuronMode {
    let template = parameter_map(&[
        ("Cm", Quantity::new(281.0, "pF")),
        ("refP", Quantity::new(2.0, "ms")),
        ("Ileak", Quantity::new(0.0, "pA")),
        ("Iexp", Quantity::new(0.0, "pA")),
        ("Iadapt", Quantity::new(0.0, "pA")),
        ("Inoise", Quantity::new(0.0, "pA")),
        ("Iconst", Quantity::new(0.0, "pA")),
        ("Vthr", Quantity::new(-50.4, "mV")),
        ("Vres", Quantity::new(-70.6, "mV")),
    ]);

    let equation_sets = [
        (
            "calcium_feedback",
            Block::new(
                V_ADAPT,
                parameter_map(&[
                    ("gAdapt", Quantity::new(4.0, "nS")),
                    ("wIadapt", Quantity::new(0.0805, "nA")),
                    ("tauIadapt", Quantity::new(144.0, "ms")),
                    ("EL", Quantity::new(-70.6, "mV")),
                ]),
            ),
        ),
        (
            "exponential",
            Block::new(
                V_EXP_CURRENT,
                parameter_map(&[
                    ("gL", Quantity::new(4.3, "nS")),
                    ("DeltaT", Quantity::new(2.0, "mV")),
                    ("VT", Quantity::new(-50.4, "mV")),
                ]),
            ),
        ),
        (
            "quadratic",
            Block::new(
                V_QUAD_CURRENT,
                parameter_map(&[
                    ("Cm", Quantity::new(250.0, "pF")),
                    ("Vpeak", Quantity::new(30.0, "mV")),
                    ("VR", Quantity::new(-60.0, "mV")),
                    ("VT", Quantity::new(-20.0, "mV")),
                    ("a", Quantity::new(0.01, "ms**-1")),
                    ("b", Quantity::new(0.0, "pS")),
                    ("c", Quantity::new(-65.0, "mV")),
                    ("d", Quantity::new(200.0, "pA")),
                    ("k", Quantity::new(2.5, "nS/mV")),
                    ("EL", Quantity::new(-55.0, "mV")),
                ]),
            ),
        ),
        (
            "leaky",
            Block::new(
                V_LEAK,
                parameter_map(&[
                    ("gL", Quantity::new(4.3, "nS")),
                    ("EL", Quantity::new(-55.0, "mV")),
                ]),
            ),
        ),
        ("non_leaky", Block::new(NONE, ParameterMap::new())),
        ("spatial", Block::new(SPATIAL, ParameterMap::new())),
        ("gaussian", Block::new(V_NOISE, ParameterMap::new())),
        ("none", Block::new(NONE, ParameterMap::new())),
        ("linear", Block::new(NONE, ParameterMap::new())),
        (
            "threshold_adaptation",
            Block::new(THR_ADAPT, thr_adapt_parameters()),
        ),
        (
            "activity",
            Block::new(ACTIVITY, parameter_map(&[("tauAct", Quantity::new(100.0, "ms"))])),
        ),
    ]
    .into_iter()
    .collect();

    NeuronMode {
        template: Block::new(V_MODEL_TEMPLATE, template),
        equation_sets,
    }
}

fn quantized_mode() -> NeuronMode {
    let template = parameter_map(&[
        ("rand_num_bits", Quantity::scalar(4.0)),
        ("Vthr", Quantity::new(15.0, "mV")),
        ("Vm_max", Quantity::scalar(15.0)),
        ("I_min", Quantity::new(-15.0, "mA")),
        ("I_max", Quantity::new(15.0, "mA")),
        ("Vrest", Quantity::new(3.0, "mV")),
        ("Vreset", Quantity::new(0.0, "mV")),
        ("Iconst", Quantity::new(0.0, "pA")),
        ("g_psc", Quantity::new(1.0, "ohm")),
        ("tau", Quantity::new(19.0, "ms")),
        ("decay_numerator", Quantity::scalar(243.0)),
        ("refrac_tau", Quantity::new(2.0, "ms")),
        ("refrac_decay_numerator", Quantity::scalar(154.0)),
        ("refP", Quantity::new(0.0, "ms")),
        ("Vm_noise", Quantity::new(0.0, "mV")),
        ("tausyn", Quantity::new(3.0, "ms")),
        ("syn_decay_numerator", Quantity::scalar(192.0)),
    ]);

    let equation_sets = [
        ("none", Block::new(NONE, ParameterMap::new())),
        ("spatial", Block::new(SPATIAL, ParameterMap::new())),
        (
            "lfsr",
            Block::new(LFSR, parameter_map(&[("lfsr_num_bits", Quantity::scalar(6.0))])),
        ),
        (
            "threshold_adaptation",
            Block::new(QUANTIZED_THR_ADAPT, thr_adapt_parameters()),
        ),
    ]
    .into_iter()
    .collect();

    NeuronMode {
        template: Block::new(Q_MODEL_TEMPLATE, template),
        equation_sets,
    }
}

lazy_static! {
    /// Neuron base units, indexed by name.
    pub static ref BASE_UNITS: Registry<NeuronMode> = [
        ("current", current_mode()),
        ("voltage", voltage_mode()),
        ("quantized", quantized_mode()),
    ]
    .into_iter()
    .collect();
}
